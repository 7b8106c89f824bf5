//! Direct message handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::models::AuthenticatedUser;
use crate::features::messages::dtos::{MessageDto, SendMessageDto};
use crate::features::messages::services::MessageService;
use crate::shared::types::ApiResponse;

/// Send a direct message
#[utoipa::path(
    post,
    path = "/api/messages",
    tag = "messages",
    request_body = SendMessageDto,
    responses(
        (status = 201, description = "Message sent", body = ApiResponse<MessageDto>),
        (status = 400, description = "Empty content or self-message"),
        (status = 404, description = "Receiver not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn send_message(
    user: AuthenticatedUser,
    State(service): State<Arc<MessageService>>,
    AppJson(dto): AppJson<SendMessageDto>,
) -> Result<(StatusCode, Json<ApiResponse<MessageDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let result = service.send_message(user.id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(result), None, None)),
    ))
}

/// The conversation between the caller and another user
#[utoipa::path(
    get,
    path = "/api/messages/{user_id}",
    tag = "messages",
    params(("user_id" = i64, Path, description = "The other participant")),
    responses(
        (status = 200, description = "Conversation fetched", body = ApiResponse<Vec<MessageDto>>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_conversation(
    user: AuthenticatedUser,
    State(service): State<Arc<MessageService>>,
    Path(user_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<MessageDto>>>> {
    let result = service.get_conversation(user.id, user_id).await?;
    Ok(Json(ApiResponse::success(Some(result), None, None)))
}
