//! Thin Stripe Checkout client behind a trait seam so the subscription
//! service can be tested without the network.

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::core::error::{AppError, Result};

const STRIPE_API_BASE: &str = "https://api.stripe.com";

/// A created Checkout session: opaque id plus the URL the client redirects to.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

/// Parameters for a monthly subscription Checkout session.
#[derive(Debug, Clone)]
pub struct SubscriptionCheckout {
    pub amount: Decimal,
    pub currency: String,
    pub success_url: String,
    pub cancel_url: String,
    pub creator_id: i64,
    pub subscriber_id: i64,
}

#[async_trait]
pub trait BillingClient: Send + Sync {
    async fn create_subscription_checkout(
        &self,
        checkout: SubscriptionCheckout,
    ) -> Result<CheckoutSession>;
}

pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
}

impl StripeClient {
    pub fn new(secret_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key,
        }
    }
}

#[async_trait]
impl BillingClient for StripeClient {
    async fn create_subscription_checkout(
        &self,
        checkout: SubscriptionCheckout,
    ) -> Result<CheckoutSession> {
        // Stripe wants the amount in the currency's minor unit.
        let unit_amount = (checkout.amount * Decimal::from(100))
            .round()
            .to_i64()
            .ok_or_else(|| {
                AppError::Validation("Subscription price is out of range".to_string())
            })?;

        let form: Vec<(&str, String)> = vec![
            ("mode", "subscription".to_string()),
            ("success_url", checkout.success_url),
            ("cancel_url", checkout.cancel_url),
            ("payment_method_types[0]", "card".to_string()),
            ("line_items[0][quantity]", "1".to_string()),
            ("line_items[0][price_data][currency]", checkout.currency),
            (
                "line_items[0][price_data][unit_amount]",
                unit_amount.to_string(),
            ),
            (
                "line_items[0][price_data][recurring][interval]",
                "month".to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]",
                "Creator subscription".to_string(),
            ),
            ("metadata[creator_id]", checkout.creator_id.to_string()),
            (
                "metadata[subscriber_id]",
                checkout.subscriber_id.to_string(),
            ),
        ];

        let response = self
            .http
            .post(format!("{}/v1/checkout/sessions", STRIPE_API_BASE))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Stripe checkout request failed: {:?}", e);
                AppError::ExternalServiceError("Could not reach the payment provider".to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Stripe checkout rejected ({}): {}", status, body);
            return Err(AppError::ExternalServiceError(
                "Payment provider rejected the checkout request".to_string(),
            ));
        }

        response.json::<CheckoutSession>().await.map_err(|e| {
            tracing::error!("Malformed Stripe checkout response: {:?}", e);
            AppError::ExternalServiceError("Malformed payment provider response".to_string())
        })
    }
}
