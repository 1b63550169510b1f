//! Database connection management
//!
//! Deployments reach PostgreSQL through a transaction-mode pooler (PgCat /
//! PgBouncer), so consecutive statements of one logical session may land on
//! different physical connections. The pool is therefore built with the
//! statement cache disabled, and the order store issues every statement as
//! non-persistent.

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use std::str::FromStr;
use std::time::Duration;

use crate::config::DatabaseConfig;

/// PostgreSQL database connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool and verify it with a ping
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let options = connect_options(config)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.health_check().await?;

        tracing::info!(
            host = %config.host,
            database = %config.name,
            max_connections = config.max_connections,
            "PostgreSQL connection pool established"
        );
        Ok(db)
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health
    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1")
            .persistent(false)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Apply pending schema migrations from `migrations/`
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Database migrations applied");
        Ok(())
    }
}

/// Build pooler-safe connect options from config
pub fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions, sqlx::Error> {
    let ssl_mode = PgSslMode::from_str(&config.ssl_mode)?;

    Ok(PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .database(&config.name)
        .username(&config.user)
        .password(&config.password)
        .ssl_mode(ssl_mode)
        .application_name("order_service")
        .statement_cache_capacity(0))
}
