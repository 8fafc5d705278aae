use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User role, stored as the `user_role` SQL enum.
///
/// There is no hierarchy between roles: every protected route enumerates its
/// allow-set explicitly, and ADMIN gets no implicit access to MANAGER-only
/// routes.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Manager,
    User,
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

/// Public projection of a stored user: what login, refresh, and `/me` return.
///
/// Credential fields (`password_hash`, `refresh_token`) live only on
/// [`AuthUser`]; handlers never serialize them by construction.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Internal projection including the credential fields.
///
/// Selected only by the authentication flow (login needs the hash, refresh
/// needs the stored token value). Deliberately does not implement
/// `Serialize`.
#[derive(Debug, Clone, FromRow)]
pub struct AuthUser {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password_hash: String,
    /// Last-issued refresh token, or `None` when there is no active session.
    pub refresh_token: Option<String>,
}

impl AuthUser {
    /// Strips the credential fields.
    pub fn into_public(self) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
            role: self.role,
        }
    }
}

/// Listing shape for task assignment (`GET /api/auth/users`).
#[derive(Debug, Serialize, FromRow)]
pub struct AssignableUser {
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        assert_eq!(serde_json::to_string(&Role::Manager).unwrap(), "\"MANAGER\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"USER\"");

        let role: Role = serde_json::from_str("\"MANAGER\"").unwrap();
        assert_eq!(role, Role::Manager);
    }

    #[test]
    fn test_default_role_is_user() {
        assert_eq!(Role::default(), Role::User);
    }

    #[test]
    fn test_into_public_drops_credentials() {
        let user = AuthUser {
            id: 7,
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            role: Role::User,
            password_hash: "$2b$12$hash".to_string(),
            refresh_token: Some("token".to_string()),
        };

        let public = user.into_public();
        let json = serde_json::to_value(&public).unwrap();

        assert_eq!(public.id, 7);
        assert!(json.get("password_hash").is_none());
        assert!(json.get("refresh_token").is_none());
        assert_eq!(json["role"], "USER");
    }
}
