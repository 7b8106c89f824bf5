//! Post feed handlers.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::debug;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::models::AuthenticatedUser;
use crate::features::posts::dtos::{
    CreatePostInput, ListPostsQuery, MediaStatsDto, PostListDto, PostViewDto, ScrollDto,
    UpdatePostDto, UploadedFile,
};
use crate::features::posts::services::PostService;
use crate::shared::types::{ApiResponse, Meta, ScrollQuery};

/// Create a post
///
/// Accepts multipart/form-data with:
/// - `content`: post text (optional when files are attached)
/// - `visibility`: "public" or "private" (optional, defaults to "public")
/// - `is_paid_only`: "true" to gate the post behind a subscription
/// - `document_type`: optional label for document posts
/// - `files`: repeated file fields (images, one video, or documents)
#[utoipa::path(
    post,
    path = "/api/posts",
    tag = "posts",
    request_body(content_type = "multipart/form-data", description = "Post form with optional media attachments"),
    responses(
        (status = 201, description = "Post created", body = ApiResponse<PostViewDto>),
        (status = 400, description = "Invalid form or rejected attachment"),
        (status = 401, description = "Authentication required"),
        (status = 413, description = "Body too large")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_post(
    user: AuthenticatedUser,
    State(service): State<Arc<PostService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<PostViewDto>>)> {
    let mut input = CreatePostInput::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "content" => {
                input.content = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read content field: {}", e))
                })?;
            }
            "visibility" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read visibility field: {}", e))
                })?;
                if !text.is_empty() {
                    input.visibility = Some(text.to_lowercase());
                }
            }
            "is_paid_only" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read is_paid_only field: {}", e))
                })?;
                input.is_paid_only = matches!(text.to_lowercase().as_str(), "true" | "1");
            }
            "document_type" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read document_type field: {}", e))
                })?;
                if !text.is_empty() {
                    input.document_type = Some(text);
                }
            }
            "files" | "file" => {
                let name = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "unnamed".to_string());
                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read file bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;
                input.files.push(UploadedFile {
                    name,
                    data: data.to_vec(),
                });
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let result = service.create_post(user.id, input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(result),
            Some("Post created".to_string()),
            None,
        )),
    ))
}

/// Offset-paginated feed, newest first
#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "posts",
    params(ListPostsQuery),
    responses(
        (status = 200, description = "Posts fetched", body = ApiResponse<PostListDto>),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_posts(
    user: AuthenticatedUser,
    State(service): State<Arc<PostService>>,
    Query(query): Query<ListPostsQuery>,
) -> Result<Json<ApiResponse<PostListDto>>> {
    let result = service.list_posts(&query, user.id).await?;
    let total = result.total;

    Ok(Json(ApiResponse::success(
        Some(result),
        None,
        Some(Meta { total }),
    )))
}

/// Cursor-scrolled feed ordered by post id
#[utoipa::path(
    get,
    path = "/api/posts/scroll",
    tag = "posts",
    params(ScrollQuery),
    responses(
        (status = 200, description = "Posts fetched", body = ApiResponse<ScrollDto>),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn scroll_posts(
    user: AuthenticatedUser,
    State(service): State<Arc<PostService>>,
    Query(query): Query<ScrollQuery>,
) -> Result<Json<ApiResponse<ScrollDto>>> {
    let result = service
        .scroll_posts(query.after(), query.limit(), user.id)
        .await?;

    Ok(Json(ApiResponse::success(Some(result), None, None)))
}

/// Single post as seen by the caller
#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    tag = "posts",
    params(("id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post fetched", body = ApiResponse<PostViewDto>),
        (status = 404, description = "Post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_post(
    user: AuthenticatedUser,
    State(service): State<Arc<PostService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<PostViewDto>>> {
    let result = service.get_post(id, user.id).await?;
    Ok(Json(ApiResponse::success(Some(result), None, None)))
}

/// Update one of the caller's posts
#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    tag = "posts",
    params(("id" = i64, Path, description = "Post ID")),
    request_body = UpdatePostDto,
    responses(
        (status = 200, description = "Post updated", body = ApiResponse<PostViewDto>),
        (status = 403, description = "Not the post owner"),
        (status = 404, description = "Post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_post(
    user: AuthenticatedUser,
    State(service): State<Arc<PostService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<UpdatePostDto>,
) -> Result<Json<ApiResponse<PostViewDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let result = service.update_post(id, user.id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(result),
        Some("Post updated".to_string()),
        None,
    )))
}

/// Delete one of the caller's posts together with its media
#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    tag = "posts",
    params(("id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post deleted"),
        (status = 403, description = "Not the post owner"),
        (status = 404, description = "Post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_post(
    user: AuthenticatedUser,
    State(service): State<Arc<PostService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete_post(id, user.id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Post deleted".to_string()),
        None,
    )))
}

/// Media counts by type plus the supported format lists
#[utoipa::path(
    get,
    path = "/api/posts/media/stats",
    tag = "posts",
    responses(
        (status = 200, description = "Statistics fetched", body = ApiResponse<MediaStatsDto>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn media_statistics(
    _user: AuthenticatedUser,
    State(service): State<Arc<PostService>>,
) -> Result<Json<ApiResponse<MediaStatsDto>>> {
    let result = service.media_statistics().await?;
    Ok(Json(ApiResponse::success(Some(result), None, None)))
}
