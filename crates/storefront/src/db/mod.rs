//! Database operations for storefront `PostgreSQL`.
//!
//! # Database: `tealeaf_storefront`
//!
//! The CMS is the source of truth for catalog data and the order intake
//! service owns orders; `PostgreSQL` here stores local state only:
//!
//! ## Tables
//!
//! - `sessions` - Tower-sessions storage (carts live inside session data),
//!   created at startup via the store's own migration

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
