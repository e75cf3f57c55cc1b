//! In-memory implementation of `RequestStore`.
//!
//! Holds every request in a vector behind a `RwLock`. Ids are handed out
//! sequentially and nothing survives a restart. Used by the test suites.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::models::requests::{Decision, DecisionPolicy, Request, RequestStatus};
use super::store::RequestStore;
use crate::error::{RequestError, Result};

#[derive(Default)]
struct Table {
    last_id: i32,
    rows: Vec<Request>,
}

#[derive(Default)]
pub struct InMemoryRequestStore {
    table: RwLock<Table>,
}

impl InMemoryRequestStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RequestStore for InMemoryRequestStore {
    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn insert(&self, name: &str, info: Option<&str>) -> Result<Request> {
        let mut table = self.table.write().await;
        table.last_id += 1;
        let request = Request {
            id: table.last_id,
            name: name.to_string(),
            info: info.map(str::to_string),
            status: RequestStatus::Pending,
            created_at: Utc::now(),
            decided_at: None,
        };
        table.rows.push(request.clone());
        Ok(request)
    }

    async fn list_all(&self) -> Result<Vec<Request>> {
        let table = self.table.read().await;
        let mut rows = table.rows.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn decide(&self, id: i32, decision: Decision, policy: DecisionPolicy) -> Result<Request> {
        let mut table = self.table.write().await;
        let row = table
            .rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(RequestError::NotFound(id))?;

        if policy == DecisionPolicy::Final && row.status.is_decided() {
            return Err(RequestError::Conflict { id, status: row.status });
        }

        row.status = decision.outcome();
        row.decided_at = Some(Utc::now());
        Ok(row.clone())
    }

    async fn now(&self) -> Result<DateTime<Utc>> {
        Ok(Utc::now())
    }

    async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ids_are_sequential() {
        let store = InMemoryRequestStore::new();
        let a = store.insert("a", None).await.unwrap();
        let b = store.insert("b", Some("note")).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(b.info.as_deref(), Some("note"));
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = InMemoryRequestStore::new();
        for name in ["first", "second", "third"] {
            store.insert(name, None).await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }
        let names: Vec<_> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, ["third", "second", "first"]);
    }

    #[tokio::test]
    async fn final_policy_refuses_second_decision() {
        let store = InMemoryRequestStore::new();
        let req = store.insert("x", None).await.unwrap();
        store
            .decide(req.id, Decision::Reject, DecisionPolicy::Final)
            .await
            .unwrap();

        let err = store
            .decide(req.id, Decision::Approve, DecisionPolicy::Final)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RequestError::Conflict { status: RequestStatus::Rejected, .. }
        ));

        let stored = store.list_all().await.unwrap().remove(0);
        assert_eq!(stored.status, RequestStatus::Rejected);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let store = InMemoryRequestStore::new();
        let err = store
            .decide(42, Decision::Approve, DecisionPolicy::Overwrite)
            .await
            .unwrap_err();
        assert!(matches!(err, RequestError::NotFound(42)));
    }
}
