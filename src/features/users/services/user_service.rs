use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::users::dtos::{CreatorInfoDto, ProfileDto, UpdateProfileDto};
use crate::features::users::models::User;

/// Service for user profiles and the public creator directory
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: i64) -> Result<User> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch user {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        user.ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn get_profile(&self, id: i64) -> Result<ProfileDto> {
        Ok(self.get_by_id(id).await?.into())
    }

    /// Public info shown next to a creator's posts
    pub async fn get_creator_info(&self, id: i64) -> Result<CreatorInfoDto> {
        let info = sqlx::query_as::<_, CreatorInfoDto>(
            "SELECT id, username, full_name, avatar_url, monthly_price FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch creator info {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        info.ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn update_profile(&self, id: i64, dto: UpdateProfileDto) -> Result<ProfileDto> {
        if let Some(price) = dto.monthly_price {
            if price < Decimal::ZERO {
                return Err(AppError::Validation(
                    "monthly_price must not be negative".to_string(),
                ));
            }
        }

        let current = self.get_by_id(id).await?;

        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET full_name = $2, bio = $3, avatar_url = $4, monthly_price = $5, stripe_price_id = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(dto.full_name.unwrap_or(current.full_name))
        .bind(dto.bio.unwrap_or(current.bio))
        .bind(dto.avatar_url.unwrap_or(current.avatar_url))
        .bind(dto.monthly_price.unwrap_or(current.monthly_price))
        .bind(dto.stripe_price_id.unwrap_or(current.stripe_price_id))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update profile {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        tracing::info!("Profile updated: user={}", updated.id);
        Ok(updated.into())
    }
}
