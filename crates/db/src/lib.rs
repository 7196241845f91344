//! Persistence layer for the Marquee movie catalog.
//!
//! - [`models`] -- row structs, views and create/update DTOs.
//! - [`repositories`] -- one zero-sized repository per table.
//! - [`unit_of_work`] -- scoped transactions with commit-or-rollback.
//! - [`catalog`] -- the movie aggregate writer and the paginated listing.

use sqlx::postgres::PgPoolOptions;

pub mod catalog;
pub mod error;
pub mod models;
pub mod repositories;
pub mod unit_of_work;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply any pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
