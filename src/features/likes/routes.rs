//! Like routes

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::likes::handlers;
use crate::features::likes::services::LikeService;

pub fn routes(service: Arc<LikeService>) -> Router {
    Router::new()
        .route("/api/posts/{id}/like", post(handlers::toggle_like))
        .route("/api/posts/{id}/likes", get(handlers::like_stats))
        .with_state(service)
}
