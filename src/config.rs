use std::env;

/// Process configuration, read once at startup.
///
/// Required variables (`DATABASE_URL`, `JWT_SECRET`, `JWT_REFRESH_SECRET`)
/// abort the process immediately when missing rather than failing on the
/// first request that needs them.
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    /// Secret for signing access tokens.
    pub access_secret: String,
    /// Secret for signing refresh tokens. Independent of the access secret.
    pub refresh_secret: String,
    /// Access token lifetime in minutes.
    pub access_ttl_mins: i64,
    /// Refresh token lifetime in days.
    pub refresh_ttl_days: i64,
    /// Origin allowed by CORS, with credentials.
    pub client_origin: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
            access_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            refresh_secret: env::var("JWT_REFRESH_SECRET").expect("JWT_REFRESH_SECRET must be set"),
            access_ttl_mins: env::var("JWT_ACCESS_TTL_MINS")
                .unwrap_or_else(|_| "15".to_string())
                .parse()
                .expect("JWT_ACCESS_TTL_MINS must be a number"),
            refresh_ttl_days: env::var("JWT_REFRESH_TTL_DAYS")
                .unwrap_or_else(|_| "7".to_string())
                .parse()
                .expect("JWT_REFRESH_TTL_DAYS must be a number"),
            client_origin: env::var("CLIENT_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
        }
    }
}
