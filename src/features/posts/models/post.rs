use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::shared::ownership::Owned;

/// Database model for posts
#[derive(Debug, Clone, FromRow)]
pub struct Post {
    pub id: i64,
    pub creator_id: i64,
    pub content: String,
    /// `public` or `private`
    pub visibility: String,
    /// Paid-only posts are gated behind an active subscription to the creator
    pub is_paid_only: bool,
    pub document_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for Post {
    fn owner_id(&self) -> i64 {
        self.creator_id
    }
}
