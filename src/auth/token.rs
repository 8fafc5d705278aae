use crate::config::Config;
use crate::error::AppError;
use crate::models::user::{Role, User};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `iss` claim stamped into and required of every token.
pub const TOKEN_ISSUER: &str = "task-manager-api";
/// `aud` claim stamped into and required of every token.
pub const TOKEN_AUDIENCE: &str = "task-manager-client";

/// Claims carried by a short-lived access token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AccessClaims {
    /// Subject: the user's id.
    pub sub: i32,
    /// Role at issuance time. The middleware re-resolves the identity on
    /// every request, so a stale role here only survives until expiry.
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
}

/// Claims carried by a refresh token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RefreshClaims {
    /// Subject: the user's id.
    pub sub: i32,
    /// Random per-token id. Keeps two tokens minted for the same user within
    /// the same second from being bit-identical.
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
}

/// Why token verification failed. Expiry is reported separately so the
/// middleware can tell clients to refresh instead of re-authenticate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyError {
    Expired,
    Invalid,
}

/// Signs and verifies both token kinds.
///
/// Built once at startup from [`Config`]; a missing secret aborts the process
/// there (in `Config::from_env`), never on a per-call basis. Access and
/// refresh tokens use independent secrets.
#[derive(Clone)]
pub struct TokenIssuer {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(
        access_secret: &str,
        refresh_secret: &str,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(refresh_secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.access_secret,
            &config.refresh_secret,
            Duration::minutes(config.access_ttl_mins),
            Duration::days(config.refresh_ttl_days),
        )
    }

    /// Refresh token lifetime, also used for the cookie max-age.
    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Signs an access token for `user` with the access secret.
    pub fn issue_access_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: user.id,
            role: user.role,
            iat: now.timestamp(),
            exp: (now + self.access_ttl).timestamp(),
            iss: TOKEN_ISSUER.to_string(),
            aud: TOKEN_AUDIENCE.to_string(),
        };

        encode(&Header::default(), &claims, &self.access_encoding)
            .map_err(|e| AppError::InternalServerError(format!("Failed to sign access token: {}", e)))
    }

    /// Signs a refresh token for `user` with the refresh secret.
    pub fn issue_refresh_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = RefreshClaims {
            sub: user.id,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + self.refresh_ttl).timestamp(),
            iss: TOKEN_ISSUER.to_string(),
            aud: TOKEN_AUDIENCE.to_string(),
        };

        encode(&Header::default(), &claims, &self.refresh_encoding).map_err(|e| {
            AppError::InternalServerError(format!("Failed to sign refresh token: {}", e))
        })
    }

    /// Verifies signature, expiry, issuer, and audience of an access token.
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims, VerifyError> {
        decode::<AccessClaims>(token, &self.access_decoding, &Self::validation())
            .map(|data| data.claims)
            .map_err(classify)
    }

    /// Verifies signature, expiry, issuer, and audience of a refresh token.
    ///
    /// A token that passes here still has no authority on its own: the
    /// authentication flow additionally requires equality with the value
    /// stored on the identity.
    pub fn verify_refresh_token(&self, token: &str) -> Result<RefreshClaims, VerifyError> {
        decode::<RefreshClaims>(token, &self.refresh_decoding, &Self::validation())
            .map(|data| data.claims)
            .map_err(classify)
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_audience(&[TOKEN_AUDIENCE]);
        validation
    }
}

fn classify(error: jsonwebtoken::errors::Error) -> VerifyError {
    match error.kind() {
        ErrorKind::ExpiredSignature => VerifyError::Expired,
        _ => VerifyError::Invalid,
    }
}
