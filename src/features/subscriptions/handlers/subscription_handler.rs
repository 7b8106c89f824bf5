//! Subscription handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::models::AuthenticatedUser;
use crate::features::subscriptions::dtos::{
    CheckoutSessionDto, FollowerIdsDto, PaidSubscribeDto, SplitFollowersDto,
    SplitSubscriptionsDto, SubscribeDto, SubscriptionDto, UnsubscribeQuery,
};
use crate::features::subscriptions::services::SubscriptionService;
use crate::shared::types::ApiResponse;

/// Subscribe to a creator (free) or switch subscription type
#[utoipa::path(
    post,
    path = "/api/subscribe",
    tag = "subscriptions",
    request_body = SubscribeDto,
    responses(
        (status = 200, description = "Subscription upserted", body = ApiResponse<SubscriptionDto>),
        (status = 400, description = "Invalid request or early paid renewal"),
        (status = 404, description = "Creator not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn subscribe(
    user: AuthenticatedUser,
    State(service): State<Arc<SubscriptionService>>,
    AppJson(dto): AppJson<SubscribeDto>,
) -> Result<Json<ApiResponse<SubscriptionDto>>> {
    let result = service.subscribe(user.id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(result),
        Some("Subscription updated".to_string()),
        None,
    )))
}

/// Start a Stripe Checkout session for a paid subscription
#[utoipa::path(
    post,
    path = "/api/subscribe/paid",
    tag = "subscriptions",
    request_body = PaidSubscribeDto,
    responses(
        (status = 200, description = "Checkout session created", body = ApiResponse<CheckoutSessionDto>),
        (status = 400, description = "Creator has no paid subscription"),
        (status = 404, description = "Creator not found"),
        (status = 502, description = "Payment provider unavailable")
    ),
    security(("bearer_auth" = []))
)]
pub async fn subscribe_paid(
    user: AuthenticatedUser,
    State(service): State<Arc<SubscriptionService>>,
    AppJson(dto): AppJson<PaidSubscribeDto>,
) -> Result<Json<ApiResponse<CheckoutSessionDto>>> {
    let result = service.create_paid_checkout(user.id, dto.creator_id).await?;
    Ok(Json(ApiResponse::success(Some(result), None, None)))
}

/// Deactivate the caller's subscription to a creator
#[utoipa::path(
    post,
    path = "/api/unsubscribe",
    tag = "subscriptions",
    params(UnsubscribeQuery),
    responses(
        (status = 200, description = "Unsubscribed"),
        (status = 404, description = "Subscription not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn unsubscribe(
    user: AuthenticatedUser,
    State(service): State<Arc<SubscriptionService>>,
    Query(query): Query<UnsubscribeQuery>,
) -> Result<Json<ApiResponse<()>>> {
    service.unsubscribe(user.id, query.creator_id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Unsubscribed".to_string()),
        None,
    )))
}

/// Ids of the caller's active followers
#[utoipa::path(
    get,
    path = "/api/followers",
    tag = "subscriptions",
    responses(
        (status = 200, description = "Followers fetched", body = ApiResponse<FollowerIdsDto>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn followers(
    user: AuthenticatedUser,
    State(service): State<Arc<SubscriptionService>>,
) -> Result<Json<ApiResponse<FollowerIdsDto>>> {
    let result = service.follower_ids(user.id).await?;
    Ok(Json(ApiResponse::success(Some(result), None, None)))
}

/// Followers of a creator, split into paid and free
#[utoipa::path(
    get,
    path = "/api/followers/{id}",
    tag = "subscriptions",
    params(("id" = i64, Path, description = "Creator ID")),
    responses(
        (status = 200, description = "Followers fetched", body = ApiResponse<SplitFollowersDto>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn followers_by_creator(
    _user: AuthenticatedUser,
    State(service): State<Arc<SubscriptionService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<SplitFollowersDto>>> {
    let result = service.followers_by_creator(id).await?;
    Ok(Json(ApiResponse::success(Some(result), None, None)))
}

/// Creators the caller follows, split into paid and free
#[utoipa::path(
    get,
    path = "/api/subscriptions",
    tag = "subscriptions",
    responses(
        (status = 200, description = "Subscriptions fetched", body = ApiResponse<SplitSubscriptionsDto>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn my_subscriptions(
    user: AuthenticatedUser,
    State(service): State<Arc<SubscriptionService>>,
) -> Result<Json<ApiResponse<SplitSubscriptionsDto>>> {
    let result = service.my_subscriptions(user.id).await?;
    Ok(Json(ApiResponse::success(Some(result), None, None)))
}
