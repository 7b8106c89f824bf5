//! Stripe webhook endpoint. Public route: authentication is the signature
//! header, not a bearer token.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use chrono::Utc;

use crate::core::error::{AppError, Result};
use crate::features::subscriptions::services::webhook::{parse_event, verify_signature};
use crate::features::subscriptions::services::SubscriptionService;
use crate::shared::constants::MAX_WEBHOOK_BODY_BYTES;

/// State for the webhook route: the service plus the verification knobs.
#[derive(Clone)]
pub struct WebhookState {
    pub service: Arc<SubscriptionService>,
    pub webhook_secret: String,
    /// Disabled only for tests via DISABLE_STRIPE_SIGNATURE_CHECK
    pub verify_signature: bool,
}

/// Receive a Stripe event
///
/// Parse or signature failures answer 400 without touching any state;
/// unrecognized event types answer 200 and are ignored.
#[utoipa::path(
    post,
    path = "/api/webhooks/stripe",
    tag = "subscriptions",
    request_body(content = String, description = "Raw Stripe event payload"),
    responses(
        (status = 200, description = "Event accepted"),
        (status = 400, description = "Bad signature or malformed event")
    )
)]
pub async fn stripe_webhook(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode> {
    if body.len() > MAX_WEBHOOK_BODY_BYTES {
        return Err(AppError::BadRequest("Webhook body too large".to_string()));
    }

    if state.verify_signature {
        if state.webhook_secret.is_empty() {
            tracing::error!("STRIPE_WEBHOOK_SECRET is not configured");
            return Err(AppError::Internal(
                "Webhook secret not configured".to_string(),
            ));
        }
        let signature = headers
            .get("Stripe-Signature")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::BadRequest("Missing Stripe-Signature header".to_string())
            })?;
        verify_signature(
            &state.webhook_secret,
            signature,
            &body,
            Utc::now().timestamp(),
        )?;
    } else {
        tracing::warn!("Stripe signature verification is disabled");
    }

    let event = parse_event(&body)?;
    tracing::info!("Stripe event received: {}", event.event_type);

    state.service.apply_webhook_event(event).await;
    Ok(StatusCode::OK)
}
