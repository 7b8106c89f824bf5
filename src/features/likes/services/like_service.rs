//! Like toggling. Concurrent toggles race at the UNIQUE (post_id, user_id)
//! constraint, not in application logic.

use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::likes::dtos::{LikeStatsDto, ToggleLikeDto};

pub struct LikeService {
    pool: PgPool,
}

impl LikeService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert-or-delete: if the insert hits the unique constraint the like
    /// already existed, so it is removed instead.
    pub async fn toggle_like(&self, post_id: i64, user_id: i64) -> Result<ToggleLikeDto> {
        self.ensure_post_exists(post_id).await?;

        let inserted = sqlx::query(
            "INSERT INTO likes (post_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(post_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        let liked = if inserted > 0 {
            true
        } else {
            sqlx::query("DELETE FROM likes WHERE post_id = $1 AND user_id = $2")
                .bind(post_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;
            false
        };

        let like_count = self.count_likes(post_id).await?;
        Ok(ToggleLikeDto { liked, like_count })
    }

    pub async fn stats(&self, post_id: i64, viewer_id: i64) -> Result<LikeStatsDto> {
        self.ensure_post_exists(post_id).await?;

        let like_count = self.count_likes(post_id).await?;
        let liked_by_viewer = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM likes WHERE post_id = $1 AND user_id = $2)",
        )
        .bind(post_id)
        .bind(viewer_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(LikeStatsDto {
            like_count,
            liked_by_viewer,
        })
    }

    async fn count_likes(&self, post_id: i64) -> Result<i64> {
        Ok(
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM likes WHERE post_id = $1")
                .bind(post_id)
                .fetch_one(&self.pool)
                .await?,
        )
    }

    async fn ensure_post_exists(&self, post_id: i64) -> Result<()> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM posts WHERE id = $1)")
                .bind(post_id)
                .fetch_one(&self.pool)
                .await?;
        if !exists {
            return Err(AppError::NotFound("Post not found".to_string()));
        }
        Ok(())
    }
}
