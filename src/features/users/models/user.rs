use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// Database model for users
#[derive(Debug, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub bio: String,
    pub avatar_url: String,
    pub password_hash: String,
    pub role: String,
    /// Monthly price of the creator's paid subscription
    pub monthly_price: Decimal,
    /// Stripe price associated with the creator, if any
    pub stripe_price_id: String,
    pub created_at: DateTime<Utc>,
}
