//! Post routes. The create route carries its own body limit sized to the
//! combined attachment ceiling.

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::get, Router};

use crate::features::posts::handlers;
use crate::features::posts::services::PostService;

pub fn routes(service: Arc<PostService>, upload_body_limit: usize) -> Router {
    Router::new()
        .route(
            "/api/posts",
            get(handlers::list_posts).post(handlers::create_post),
        )
        .route("/api/posts/scroll", get(handlers::scroll_posts))
        .route("/api/posts/media/stats", get(handlers::media_statistics))
        .route(
            "/api/posts/{id}",
            get(handlers::get_post)
                .put(handlers::update_post)
                .delete(handlers::delete_post),
        )
        .layer(DefaultBodyLimit::max(upload_body_limit))
        .with_state(service)
}
