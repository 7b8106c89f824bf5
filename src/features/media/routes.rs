//! Media routes

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::media::handlers;
use crate::features::media::services::MediaService;

pub fn routes(service: Arc<MediaService>) -> Router {
    Router::new()
        .route(
            "/api/media/{id}",
            get(handlers::get_media).delete(handlers::delete_media),
        )
        .route("/api/media/{id}/metadata", put(handlers::update_metadata))
        .route("/api/media/post/{post_id}", get(handlers::list_by_post))
        .route("/api/media/cleanup", post(handlers::cleanup_orphaned_media))
        .with_state(service)
}
