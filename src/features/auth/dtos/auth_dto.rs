use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::shared::validation::USERNAME_REGEX;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterDto {
    #[validate(
        length(min = 3, max = 32, message = "username must be 3-32 characters"),
        regex(
            path = *USERNAME_REGEX,
            message = "username must start with a letter or underscore and contain only letters, digits and underscores"
        )
    )]
    pub username: String,

    #[validate(email(message = "invalid email address"))]
    pub email: String,

    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,

    #[validate(length(max = 120, message = "full_name too long"))]
    pub full_name: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginDto {
    #[validate(email(message = "invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponseDto {
    pub token: String,
    pub user_id: i64,
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::{Password, SafeEmail};
    use fake::faker::name::en::Name;
    use fake::Fake;

    fn valid_register() -> RegisterDto {
        RegisterDto {
            username: "ada_lovelace".to_string(),
            email: SafeEmail().fake(),
            password: Password(8..32).fake(),
            full_name: Some(Name().fake()),
        }
    }

    #[test]
    fn well_formed_registration_validates() {
        assert!(valid_register().validate().is_ok());
    }

    #[test]
    fn username_must_match_the_pattern() {
        let mut dto = valid_register();
        dto.username = "2fast".to_string();
        assert!(dto.validate().is_err());

        dto.username = "with space".to_string();
        assert!(dto.validate().is_err());

        dto.username = "ab".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn email_and_password_rules_apply() {
        let mut dto = valid_register();
        dto.email = "not-an-email".to_string();
        assert!(dto.validate().is_err());

        let mut dto = valid_register();
        dto.password = "short".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn login_requires_email_shape_and_a_password() {
        let ok = LoginDto {
            email: SafeEmail().fake(),
            password: Password(8..32).fake(),
        };
        assert!(ok.validate().is_ok());

        let empty = LoginDto {
            email: SafeEmail().fake(),
            password: String::new(),
        };
        assert!(empty.validate().is_err());
    }
}
