//! Message routes

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::messages::handlers;
use crate::features::messages::services::MessageService;

pub fn routes(service: Arc<MessageService>) -> Router {
    Router::new()
        .route("/api/messages", post(handlers::send_message))
        .route("/api/messages/{user_id}", get(handlers::get_conversation))
        .with_state(service)
}
