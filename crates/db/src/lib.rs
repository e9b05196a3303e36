//! upwatch data layer: pool bootstrap, migrations, models, repositories.
//!
//! Shared infrastructure (the tenant registry and the ping-job queue)
//! lives in the control schema and is covered by the embedded migrations.
//! Tenant data lives in per-tenant schemas created at provisioning time;
//! see [`provisioning`] for the canonical partition DDL.

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod provisioning;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending control-schema migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
