//! Database connection pool initialization.
//!
//! Reads the connection string from `DATABASE_URL`. Call once at startup;
//! the returned pool is cheaply cloneable.

use sqlx::PgPool;
use std::env;

/// Initializes a PostgreSQL connection pool.
///
/// # Panics
///
/// Panics if `DATABASE_URL` is not set or the connection fails; both are
/// startup-fatal.
pub async fn init_db_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database")
}
