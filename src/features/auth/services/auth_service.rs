//! Registration and login backed by argon2 password hashing

use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{LoginDto, RegisterDto, TokenResponseDto};
use crate::features::auth::services::TokenService;
use crate::features::users::models::User;

pub struct AuthService {
    pool: PgPool,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(pool: PgPool, tokens: Arc<TokenService>) -> Self {
        Self { pool, tokens }
    }

    pub async fn register(&self, dto: RegisterDto) -> Result<TokenResponseDto> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(dto.password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!("Password hashing failed: {:?}", e);
                AppError::Internal("Failed to process password".to_string())
            })?
            .to_string();

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, full_name, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&dto.username)
        .bind(&dto.email)
        .bind(dto.full_name.unwrap_or_default())
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("Username or email is already taken".to_string())
            }
            _ => {
                tracing::error!("Failed to insert user: {:?}", e);
                AppError::Database(e)
            }
        })?;

        tracing::info!("User registered: id={}, username={}", user.id, user.username);

        let token = self.tokens.issue_token(user.id)?;
        Ok(TokenResponseDto {
            token,
            user_id: user.id,
            username: user.username,
        })
    }

    pub async fn login(&self, dto: LoginDto) -> Result<TokenResponseDto> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(&dto.email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch user by email: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

        let parsed = PasswordHash::new(&user.password_hash).map_err(|e| {
            tracing::error!("Stored password hash is malformed for user {}: {:?}", user.id, e);
            AppError::Internal("Failed to verify password".to_string())
        })?;

        if Argon2::default()
            .verify_password(dto.password.as_bytes(), &parsed)
            .is_err()
        {
            return Err(AppError::Unauthorized(
                "Invalid email or password".to_string(),
            ));
        }

        let token = self.tokens.issue_token(user.id)?;
        Ok(TokenResponseDto {
            token,
            user_id: user.id,
            username: user.username,
        })
    }
}
