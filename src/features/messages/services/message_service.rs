use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::messages::dtos::{MessageDto, SendMessageDto};
use crate::features::messages::models::Message;

pub struct MessageService {
    pool: PgPool,
}

impl MessageService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn send_message(&self, sender_id: i64, dto: SendMessageDto) -> Result<MessageDto> {
        if dto.content.trim().is_empty() {
            return Err(AppError::Validation(
                "content must not be empty".to_string(),
            ));
        }
        if dto.receiver_id == sender_id {
            return Err(AppError::Validation(
                "Cannot send a message to yourself".to_string(),
            ));
        }

        let receiver_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
                .bind(dto.receiver_id)
                .fetch_one(&self.pool)
                .await?;
        if !receiver_exists {
            return Err(AppError::NotFound("Receiver not found".to_string()));
        }

        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (sender_id, receiver_id, content)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(sender_id)
        .bind(dto.receiver_id)
        .bind(dto.content.trim())
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(
            "Message sent: id={}, sender={}, receiver={}",
            message.id,
            sender_id,
            dto.receiver_id
        );
        Ok(message.into())
    }

    /// Both directions of the two-party conversation, oldest first.
    pub async fn get_conversation(&self, user_id: i64, other_id: i64) -> Result<Vec<MessageDto>> {
        let messages = sqlx::query_as::<_, Message>(
            r#"
            SELECT * FROM messages
            WHERE (sender_id = $1 AND receiver_id = $2)
               OR (sender_id = $2 AND receiver_id = $1)
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .bind(other_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages.into_iter().map(Into::into).collect())
    }
}
