use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::models::{AuthenticatedUser, Claims};

/// Issues and validates HS256 access tokens. The signing secret is injected
/// through [`AuthConfig`] at construction, never read from process-wide state.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl_secs: u64,
}

impl TokenService {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            token_ttl_secs: config.token_ttl_secs,
        }
    }

    pub fn issue_token(&self, user_id: i64) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            iat: now,
            exp: now + self.token_ttl_secs as i64,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(AuthenticatedUser {
            id: data.claims.sub,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(AuthConfig {
            jwt_secret: "unit-test-secret-0123456789".to_string(),
            token_ttl_secs: 3600,
        })
    }

    #[test]
    fn issued_token_round_trips() {
        let svc = service();
        let token = svc.issue_token(42).unwrap();
        let user = svc.validate_token(&token).unwrap();
        assert_eq!(user.id, 42);
    }

    #[test]
    fn garbage_token_is_unauthorized() {
        let svc = service();
        let err = svc.validate_token("not.a.jwt").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let issuer = TokenService::new(AuthConfig {
            jwt_secret: "a-completely-different-secret".to_string(),
            token_ttl_secs: 3600,
        });
        let token = issuer.issue_token(1).unwrap();
        assert!(service().validate_token(&token).is_err());
    }
}
