use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::subscriptions::models::Subscription;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubscribeDto {
    pub creator_id: i64,

    /// `free` or `paid`
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PaidSubscribeDto {
    pub creator_id: i64,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct UnsubscribeQuery {
    pub creator_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubscriptionDto {
    pub id: i64,
    pub subscriber_id: i64,
    pub creator_id: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    #[serde(rename = "type")]
    pub kind: String,
}

impl From<Subscription> for SubscriptionDto {
    fn from(s: Subscription) -> Self {
        Self {
            id: s.id,
            subscriber_id: s.subscriber_id,
            creator_id: s.creator_id,
            start_date: s.start_date,
            end_date: s.end_date,
            is_active: s.is_active,
            kind: s.kind,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FollowerIdsDto {
    pub followers: Vec<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FollowerEntryDto {
    pub subscriber_id: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SplitFollowersDto {
    pub paid: Vec<FollowerEntryDto>,
    pub free: Vec<FollowerEntryDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FollowingEntryDto {
    pub creator_id: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SplitSubscriptionsDto {
    pub paid: Vec<FollowingEntryDto>,
    pub free: Vec<FollowingEntryDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutSessionDto {
    pub session_id: String,
    pub checkout_url: String,
}
