//! Media management handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::models::AuthenticatedUser;
use crate::features::media::dtos::{CleanupResultDto, MediaItemDto, UpdateMediaMetadataDto};
use crate::features::media::services::MediaService;
use crate::shared::types::ApiResponse;

/// Single media item by id
#[utoipa::path(
    get,
    path = "/api/media/{id}",
    tag = "media",
    params(("id" = i64, Path, description = "Media ID")),
    responses(
        (status = 200, description = "Media fetched", body = ApiResponse<MediaItemDto>),
        (status = 404, description = "Media not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_media(
    _user: AuthenticatedUser,
    State(service): State<Arc<MediaService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<MediaItemDto>>> {
    let result = service.get_media(id).await?;
    Ok(Json(ApiResponse::success(Some(result), None, None)))
}

/// All media attached to a post
#[utoipa::path(
    get,
    path = "/api/media/post/{post_id}",
    tag = "media",
    params(("post_id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Media fetched", body = ApiResponse<Vec<MediaItemDto>>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_by_post(
    _user: AuthenticatedUser,
    State(service): State<Arc<MediaService>>,
    Path(post_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<MediaItemDto>>>> {
    let result = service.list_by_post(post_id).await?;
    Ok(Json(ApiResponse::success(Some(result), None, None)))
}

/// Update a media item's metadata (post owner only)
#[utoipa::path(
    put,
    path = "/api/media/{id}/metadata",
    tag = "media",
    params(("id" = i64, Path, description = "Media ID")),
    request_body = UpdateMediaMetadataDto,
    responses(
        (status = 200, description = "Metadata updated", body = ApiResponse<MediaItemDto>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Media not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_metadata(
    user: AuthenticatedUser,
    State(service): State<Arc<MediaService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<UpdateMediaMetadataDto>,
) -> Result<Json<ApiResponse<MediaItemDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let result = service.update_metadata(id, user.id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(result),
        Some("Metadata updated".to_string()),
        None,
    )))
}

/// Delete a media item and its files (post owner only)
#[utoipa::path(
    delete,
    path = "/api/media/{id}",
    tag = "media",
    params(("id" = i64, Path, description = "Media ID")),
    responses(
        (status = 200, description = "Media deleted"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Media not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_media(
    user: AuthenticatedUser,
    State(service): State<Arc<MediaService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete_media(id, user.id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Media deleted".to_string()),
        None,
    )))
}

/// Remove stored files no media row references
#[utoipa::path(
    post,
    path = "/api/media/cleanup",
    tag = "media",
    responses(
        (status = 200, description = "Cleanup finished", body = ApiResponse<CleanupResultDto>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn cleanup_orphaned_media(
    _user: AuthenticatedUser,
    State(service): State<Arc<MediaService>>,
) -> Result<Json<ApiResponse<CleanupResultDto>>> {
    let result = service.cleanup_orphaned_media().await?;
    Ok(Json(ApiResponse::success(Some(result), None, None)))
}
