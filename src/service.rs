//! Request lifecycle: submit, list and the admin-gated decisions.

use std::sync::Arc;

use subtle::ConstantTimeEq;

use crate::db::models::requests::{Decision, DecisionPolicy, Request};
use crate::db::store::RequestStore;
use crate::error::{RequestError, Result};

#[derive(Clone)]
pub struct RequestService {
    store: Arc<dyn RequestStore>,
    admin_token: Arc<str>,
    policy: DecisionPolicy,
}

impl RequestService {
    pub fn new(store: Arc<dyn RequestStore>, admin_token: &str, policy: DecisionPolicy) -> Self {
        Self {
            store,
            admin_token: Arc::from(admin_token),
            policy,
        }
    }

    pub fn policy(&self) -> DecisionPolicy {
        self.policy
    }

    pub async fn submit(&self, name: Option<&str>, info: Option<&str>) -> Result<Request> {
        let name = match name {
            Some(n) if !n.is_empty() => n,
            _ => return Err(RequestError::Validation("name is required".to_string())),
        };
        let info = info.filter(|i| !i.is_empty());

        let request = self.store.insert(name, info).await?;
        tracing::info!(request_id = request.id, "Request submitted");
        Ok(request)
    }

    pub async fn list(&self) -> Result<Vec<Request>> {
        self.store.list_all().await
    }

    pub async fn approve(&self, id: i32, credential: Option<&str>) -> Result<Request> {
        self.decide(id, Decision::Approve, credential).await
    }

    pub async fn reject(&self, id: i32, credential: Option<&str>) -> Result<Request> {
        self.decide(id, Decision::Reject, credential).await
    }

    pub async fn decide(
        &self,
        id: i32,
        decision: Decision,
        credential: Option<&str>,
    ) -> Result<Request> {
        if !self.is_admin(credential) {
            tracing::warn!(request_id = id, "Decision refused: bad admin credential");
            return Err(RequestError::Unauthorized);
        }

        let request = self.store.decide(id, decision, self.policy).await?;
        tracing::info!(request_id = id, status = %request.status, "Request decided");
        Ok(request)
    }

    fn is_admin(&self, credential: Option<&str>) -> bool {
        match credential {
            Some(given) => given.as_bytes().ct_eq(self.admin_token.as_bytes()).into(),
            None => false,
        }
    }
}
