use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::comments::dtos::{CommentDto, CreateCommentDto};
use crate::features::comments::models::Comment;
use crate::shared::ownership::ensure_owner;

pub struct CommentService {
    pool: PgPool,
}

impl CommentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_comment(
        &self,
        post_id: i64,
        user_id: i64,
        dto: CreateCommentDto,
    ) -> Result<CommentDto> {
        if dto.content.trim().is_empty() {
            return Err(AppError::Validation(
                "content must not be empty".to_string(),
            ));
        }

        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM posts WHERE id = $1)")
                .bind(post_id)
                .fetch_one(&self.pool)
                .await?;
        if !exists {
            return Err(AppError::NotFound("Post not found".to_string()));
        }

        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (post_id, user_id, content)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .bind(dto.content.trim())
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Comment created: id={}, post={}", comment.id, post_id);
        Ok(comment.into())
    }

    pub async fn list_by_post(&self, post_id: i64) -> Result<Vec<CommentDto>> {
        let comments = sqlx::query_as::<_, Comment>(
            "SELECT * FROM comments WHERE post_id = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments.into_iter().map(Into::into).collect())
    }

    pub async fn delete_comment(&self, id: i64, actor_id: i64) -> Result<()> {
        let comment = sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

        ensure_owner(&comment, actor_id)?;

        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::info!("Comment deleted: id={}", id);
        Ok(())
    }
}
