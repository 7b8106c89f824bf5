use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::users::models::User;

/// The caller's own profile (private fields included)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileDto {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub bio: String,
    pub avatar_url: String,
    pub monthly_price: Decimal,
    pub stripe_price_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for ProfileDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            full_name: u.full_name,
            bio: u.bio,
            avatar_url: u.avatar_url,
            monthly_price: u.monthly_price,
            stripe_price_id: u.stripe_price_id,
            created_at: u.created_at,
        }
    }
}

/// Public creator info attached to feed items: no email, no billing internals.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct CreatorInfoDto {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub avatar_url: String,
    /// Monthly subscription price, so clients can render the paywall offer
    pub monthly_price: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileDto {
    #[validate(length(max = 120, message = "full_name too long"))]
    pub full_name: Option<String>,

    #[validate(length(max = 1000, message = "bio too long"))]
    pub bio: Option<String>,

    #[validate(url(message = "avatar_url must be a valid URL"))]
    pub avatar_url: Option<String>,

    /// Creator's monthly subscription price; must not be negative
    pub monthly_price: Option<Decimal>,

    pub stripe_price_id: Option<String>,
}
