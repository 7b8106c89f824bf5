use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::shared::ownership::Owned;

#[derive(Debug, Clone, FromRow)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Owned for Comment {
    fn owner_id(&self) -> i64 {
        self.user_id
    }
}
