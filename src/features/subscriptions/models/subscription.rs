use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for subscriptions. One row per (subscriber, creator) pair;
/// re-subscription updates the row, unsubscription deactivates it.
#[derive(Debug, Clone, FromRow)]
pub struct Subscription {
    pub id: i64,
    pub subscriber_id: i64,
    pub creator_id: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    /// `free`, `paid`, or `stripe` for rows created by the billing webhook
    #[sqlx(rename = "type")]
    pub kind: String,
    pub stripe_subscription_id: String,
}
