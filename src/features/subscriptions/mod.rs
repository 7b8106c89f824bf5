//! Subscriptions to creators: free follows, Stripe-backed paid subscriptions
//! and the billing webhook that keeps them in sync.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/subscribe` | Yes | Subscribe (free) or switch type |
//! | POST | `/api/subscribe/paid` | Yes | Start a Stripe Checkout session |
//! | POST | `/api/unsubscribe` | Yes | Deactivate a subscription |
//! | GET | `/api/followers` | Yes | Follower ids of the caller |
//! | GET | `/api/followers/{id}` | Yes | Followers of a creator, split paid/free |
//! | GET | `/api/subscriptions` | Yes | Who the caller follows, split paid/free |
//! | POST | `/api/webhooks/stripe` | No | Stripe event webhook |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::{routes, webhook_routes};
pub use services::{BillingClient, StripeClient, SubscriptionService};
