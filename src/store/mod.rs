//! Persistence layer.
//!
//! Stores are explicit, injected dependencies wrapping the process-wide
//! connection pool. `main` connects the pool once at startup and closes it
//! after the server stops; nothing here reaches for a global handle.

pub mod tasks;
pub mod users;

use sqlx::postgres::{PgPool, PgPoolOptions};

pub use tasks::TaskStore;
pub use users::UserStore;

/// Connects the process-wide pool.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
}
