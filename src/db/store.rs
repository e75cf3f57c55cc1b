//! Storage contract for request records.
//!
//! The service layer only ever talks to a `RequestStore`; the Postgres
//! implementation lives in `queries::requests` and an in-memory one in
//! `memory`. Both must behave the same at the contract level.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::models::requests::{Decision, DecisionPolicy, Request};
use crate::error::Result;

#[async_trait]
pub trait RequestStore: Send + Sync {
    /// Create the backing table if it does not exist. Safe to call on every start.
    async fn initialize(&self) -> Result<()>;

    /// Insert a new pending request and return the stored row.
    async fn insert(&self, name: &str, info: Option<&str>) -> Result<Request>;

    /// All requests, newest first.
    async fn list_all(&self) -> Result<Vec<Request>>;

    /// Record a decision and return the updated row.
    ///
    /// Fails with `NotFound` for an unknown id. Under `DecisionPolicy::Final`
    /// a request that is no longer pending fails with `Conflict` and is left
    /// untouched.
    async fn decide(&self, id: i32, decision: Decision, policy: DecisionPolicy) -> Result<Request>;

    /// Current time according to the store.
    async fn now(&self) -> Result<DateTime<Utc>>;

    /// Release the underlying connections. Called once on shutdown.
    async fn close(&self);
}
