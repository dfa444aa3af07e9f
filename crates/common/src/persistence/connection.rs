//! # Database Connection Utilities
//!
//! SQLite connection pool management driven by [`DatabaseConfig`], with a
//! health check suitable for readiness probes.

use tracing::info;

use crate::config::DatabaseConfig;

/// Connection pool type alias for SQLite
pub type SqlitePool = sqlx::SqlitePool;

/// Establish a SQLite connection pool from configuration
pub async fn establish_sqlite_pool(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::SqlitePoolOptions;

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.connect_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
        .connect(&config.url)
        .await?;

    info!(
        "SQLite connection pool established with {} max connections",
        config.max_connections
    );

    Ok(pool)
}

/// Test connection health
pub async fn test_connection_health(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pool_from_default_config() {
        let pool = establish_sqlite_pool(&DatabaseConfig::default())
            .await
            .expect("Should connect to in-memory database");

        test_connection_health(&pool)
            .await
            .expect("Health check should pass");
    }
}
