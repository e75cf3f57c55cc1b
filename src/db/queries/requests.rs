use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::db::models::requests::{Decision, DecisionPolicy, Request, RequestStatus};
use crate::db::store::RequestStore;
use crate::error::{RequestError, Result};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS requests (
        id SERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        info TEXT,
        status TEXT NOT NULL DEFAULT 'pending',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        decided_at TIMESTAMPTZ
    )
"#;

const REQUEST_COLUMNS: &str = "id, name, info, status, created_at, decided_at";

/// Postgres-backed store. Owns the pool for the lifetime of the process.
#[derive(Clone)]
pub struct PgRequestStore {
    pool: PgPool,
}

impl PgRequestStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Explains why a conditional decide matched no rows.
    async fn diagnose_missed_decision(&self, id: i32) -> RequestError {
        let current = sqlx::query_scalar::<_, String>("SELECT status FROM requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await;

        match current {
            Ok(None) => RequestError::NotFound(id),
            Ok(Some(status)) => match status.parse::<RequestStatus>() {
                Ok(status) => RequestError::Conflict { id, status },
                Err(e) => RequestError::Storage(e.to_string()),
            },
            Err(e) => e.into(),
        }
    }
}

#[async_trait]
impl RequestStore for PgRequestStore {
    async fn initialize(&self) -> Result<()> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        tracing::info!("requests table ready");
        Ok(())
    }

    async fn insert(&self, name: &str, info: Option<&str>) -> Result<Request> {
        let sql = format!(
            "INSERT INTO requests (name, info) VALUES ($1, $2) RETURNING {REQUEST_COLUMNS}"
        );
        let request = sqlx::query_as::<_, Request>(&sql)
            .bind(name)
            .bind(info)
            .fetch_one(&self.pool)
            .await?;
        Ok(request)
    }

    async fn list_all(&self) -> Result<Vec<Request>> {
        let sql = format!(
            "SELECT {REQUEST_COLUMNS} FROM requests ORDER BY created_at DESC, id DESC"
        );
        let requests = sqlx::query_as::<_, Request>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(requests)
    }

    async fn decide(&self, id: i32, decision: Decision, policy: DecisionPolicy) -> Result<Request> {
        let guard = match policy {
            DecisionPolicy::Final => " AND status = 'pending'",
            DecisionPolicy::Overwrite => "",
        };
        let sql = format!(
            "UPDATE requests SET status = $1, decided_at = NOW() \
             WHERE id = $2{guard} RETURNING {REQUEST_COLUMNS}"
        );

        let updated = sqlx::query_as::<_, Request>(&sql)
            .bind(decision.outcome().as_str())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match updated {
            Some(request) => Ok(request),
            None if policy == DecisionPolicy::Final => Err(self.diagnose_missed_decision(id).await),
            None => Err(RequestError::NotFound(id)),
        }
    }

    async fn now(&self) -> Result<DateTime<Utc>> {
        let now = sqlx::query_scalar::<_, DateTime<Utc>>("SELECT NOW()")
            .fetch_one(&self.pool)
            .await?;
        Ok(now)
    }

    async fn close(&self) {
        tracing::info!("Closing database pool...");
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }
}
