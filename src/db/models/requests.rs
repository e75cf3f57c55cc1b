// src/db/models/requests.rs
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Lifecycle state of a request. `Pending` is the only non-terminal state.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ToSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Error)]
#[error("unknown request status '{0}'")]
pub struct UnknownStatus(pub String);

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }

    pub fn is_decided(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RequestStatus::Pending),
            "approved" => Ok(RequestStatus::Approved),
            "rejected" => Ok(RequestStatus::Rejected),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

// The column is plain TEXT, so rows decode through this instead of a Postgres enum type.
impl TryFrom<String> for RequestStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// An admin decision on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    /// Status the request ends up in once the decision is recorded.
    pub fn outcome(&self) -> RequestStatus {
        match self {
            Decision::Approve => RequestStatus::Approved,
            Decision::Reject => RequestStatus::Rejected,
        }
    }
}

/// Whether a decided request may be decided again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecisionPolicy {
    /// Only pending requests can be decided; a second decision is a conflict.
    #[default]
    Final,
    /// A later decision replaces the earlier one and its timestamp.
    Overwrite,
}

impl FromStr for DecisionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "final" => Ok(DecisionPolicy::Final),
            "overwrite" => Ok(DecisionPolicy::Overwrite),
            other => Err(format!(
                "invalid decision policy '{other}' (expected 'final' or 'overwrite')"
            )),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, sqlx::FromRow, ToSchema)]
pub struct Request {
    pub id: i32,
    pub name: String,
    pub info: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
}

/// Body of a submit call. Both fields are optional at the wire level so a
/// missing `name` surfaces as a validation error rather than a decode failure.
#[derive(Debug, Serialize, Deserialize, Default, ToSchema)]
pub struct NewRequest {
    pub name: Option<String>,
    pub info: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_its_own_text() {
        for status in [
            RequestStatus::Pending,
            RequestStatus::Approved,
            RequestStatus::Rejected,
        ] {
            assert_eq!(status.as_str().parse::<RequestStatus>().unwrap(), status);
        }
        assert!("cancelled".parse::<RequestStatus>().is_err());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&RequestStatus::Approved).unwrap();
        assert_eq!(json, "\"approved\"");
    }

    #[test]
    fn decisions_map_to_terminal_states() {
        assert_eq!(Decision::Approve.outcome(), RequestStatus::Approved);
        assert_eq!(Decision::Reject.outcome(), RequestStatus::Rejected);
        assert!(Decision::Approve.outcome().is_decided());
        assert!(!RequestStatus::Pending.is_decided());
    }

    #[test]
    fn decision_policy_from_env_text() {
        assert_eq!("final".parse::<DecisionPolicy>().unwrap(), DecisionPolicy::Final);
        assert_eq!(" Overwrite ".parse::<DecisionPolicy>().unwrap(), DecisionPolicy::Overwrite);
        assert!("sometimes".parse::<DecisionPolicy>().is_err());
    }
}
