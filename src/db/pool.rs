use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

use crate::config::Config;

/// Open the process-wide connection pool. Fails if the database is unreachable.
pub async fn connect(config: &Config) -> anyhow::Result<Pool<Postgres>> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(1)
        .idle_timeout(Duration::from_secs(30))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to the database")?;

    tracing::info!(
        max_connections = config.max_connections,
        "Database pool established"
    );
    Ok(pool)
}
