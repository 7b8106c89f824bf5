mod billing;
mod subscription_service;
pub mod webhook;

pub use billing::{BillingClient, CheckoutSession, StripeClient};
pub use subscription_service::SubscriptionService;
