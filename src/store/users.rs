use sqlx::PgPool;

use crate::auth::password::hash_password;
use crate::error::AppError;
use crate::models::user::{AssignableUser, AuthUser, Role, User};

/// Credential store.
///
/// Every read spells out the soft-delete predicate (`deleted_at IS NULL`);
/// a logically removed account is invisible to authentication and listings.
/// Writes that implement rotation are compare-and-swap so concurrent callers
/// cannot both win with the same token.
#[derive(Clone)]
pub struct UserStore {
    pool: PgPool,
}

impl UserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Active-user lookup including the credential fields, for login.
    pub async fn find_active_by_email(&self, email: &str) -> Result<Option<AuthUser>, AppError> {
        let user = sqlx::query_as::<_, AuthUser>(
            "SELECT id, name, email, role, password_hash, refresh_token
             FROM users WHERE email = $1 AND deleted_at IS NULL",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Active-user lookup in the public projection, for the access
    /// middleware and the refresh flow.
    pub async fn find_active_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, role
             FROM users WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Pre-check for registration. The UNIQUE constraint on email backstops
    /// this; a racing duplicate insert still fails with Conflict.
    pub async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND deleted_at IS NULL)",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Inserts a new identity with an already-hashed password.
    pub async fn insert(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING id, name, email, role",
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Stores a freshly minted refresh token, replacing whatever was there.
    /// Used by login, where any previous session is simply superseded.
    pub async fn set_refresh_token(&self, id: i32, token: &str) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE users SET refresh_token = $1, updated_at = now()
             WHERE id = $2 AND deleted_at IS NULL",
        )
        .bind(token)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Compare-and-swap rotation: succeeds only while `old` is still the
    /// stored value. Returns `false` when the token was already rotated away
    /// or the session revoked.
    pub async fn rotate_refresh_token(
        &self,
        id: i32,
        old: &str,
        new: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE users SET refresh_token = $1, updated_at = now()
             WHERE id = $2 AND refresh_token = $3 AND deleted_at IS NULL",
        )
        .bind(new)
        .bind(id)
        .bind(old)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Clears the session holding this refresh token, if any. A no-op when
    /// no account holds it; logout is idempotent.
    pub async fn clear_refresh_token(&self, token: &str) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE users SET refresh_token = NULL, updated_at = now()
             WHERE refresh_token = $1",
        )
        .bind(token)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Active USER accounts, for task assignment.
    pub async fn list_assignable(&self) -> Result<Vec<AssignableUser>, AppError> {
        let users = sqlx::query_as::<_, AssignableUser>(
            "SELECT name, email, role
             FROM users WHERE role = $1 AND deleted_at IS NULL
             ORDER BY name",
        )
        .bind(Role::User)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Marks the account logically removed. It keeps its row but disappears
    /// from every lookup used for authentication.
    pub async fn deactivate(&self, id: i32) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE users SET deleted_at = now(), refresh_token = NULL, updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Whether any active account holds `role`.
    pub async fn role_exists(&self, role: Role) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE role = $1 AND deleted_at IS NULL)",
        )
        .bind(role)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Creates the default account for `role` unless one already exists.
    /// Called at startup for the ADMIN and MANAGER seeds.
    pub async fn seed_role_account(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<(), AppError> {
        if self.role_exists(role).await? {
            return Ok(());
        }

        let password_hash = hash_password(password)?;
        self.insert(name, email, &password_hash, role).await?;
        log::info!("Seeded default account {}", email);

        Ok(())
    }
}
