use serde::{Deserialize, Serialize};

/// The authenticated actor attached to a request by the bearer middleware.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: i64,
}

/// JWT claims for locally issued access tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
    /// Issued at (seconds since epoch)
    pub iat: i64,
}
