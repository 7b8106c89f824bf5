//! Like handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::error::Result;
use crate::features::auth::models::AuthenticatedUser;
use crate::features::likes::dtos::{LikeStatsDto, ToggleLikeDto};
use crate::features::likes::services::LikeService;
use crate::shared::types::ApiResponse;

/// Toggle the caller's like on a post
#[utoipa::path(
    post,
    path = "/api/posts/{id}/like",
    tag = "likes",
    params(("id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Like toggled", body = ApiResponse<ToggleLikeDto>),
        (status = 404, description = "Post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn toggle_like(
    user: AuthenticatedUser,
    State(service): State<Arc<LikeService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ToggleLikeDto>>> {
    let result = service.toggle_like(id, user.id).await?;
    Ok(Json(ApiResponse::success(Some(result), None, None)))
}

/// Like count and whether the caller liked the post
#[utoipa::path(
    get,
    path = "/api/posts/{id}/likes",
    tag = "likes",
    params(("id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Stats fetched", body = ApiResponse<LikeStatsDto>),
        (status = 404, description = "Post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn like_stats(
    user: AuthenticatedUser,
    State(service): State<Arc<LikeService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<LikeStatsDto>>> {
    let result = service.stats(id, user.id).await?;
    Ok(Json(ApiResponse::success(Some(result), None, None)))
}
