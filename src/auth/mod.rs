pub mod extractors;
pub mod middleware;
pub mod password;
pub mod roles;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

// Re-export the pieces handlers touch on every request
pub use extractors::CurrentUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use roles::authorize_roles;
pub use token::{TokenIssuer, TOKEN_AUDIENCE, TOKEN_ISSUER};

use crate::models::user::User;

/// Payload for a new account registration.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name for the new account.
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    /// Email address; stored lowercase and unique across accounts.
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: String,
    /// Must be at least 6 characters long.
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Payload for a login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Body returned by login and refresh.
///
/// The refresh token itself travels only in the HTTP-only cookie; this body
/// carries the access token and the public user projection.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub user: User,
}
