//! Subscription routes. The webhook lives in its own router because it is
//! public and must see the raw body.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::core::config::StripeConfig;
use crate::features::subscriptions::handlers::{self, WebhookState};
use crate::features::subscriptions::services::SubscriptionService;
use crate::shared::constants::MAX_WEBHOOK_BODY_BYTES;

pub fn routes(service: Arc<SubscriptionService>) -> Router {
    Router::new()
        .route("/api/subscribe", post(handlers::subscribe))
        .route("/api/subscribe/paid", post(handlers::subscribe_paid))
        .route("/api/unsubscribe", post(handlers::unsubscribe))
        .route("/api/followers", get(handlers::followers))
        .route("/api/followers/{id}", get(handlers::followers_by_creator))
        .route("/api/subscriptions", get(handlers::my_subscriptions))
        .with_state(service)
}

pub fn webhook_routes(service: Arc<SubscriptionService>, stripe: &StripeConfig) -> Router {
    let state = WebhookState {
        service,
        webhook_secret: stripe.webhook_secret.clone(),
        verify_signature: stripe.verify_webhook_signature,
    };

    Router::new()
        .route("/api/webhooks/stripe", post(handlers::stripe_webhook))
        .layer(DefaultBodyLimit::max(MAX_WEBHOOK_BODY_BYTES))
        .with_state(state)
}
