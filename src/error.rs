//! Error type shared by the store, the service and the HTTP layer.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::db::models::requests::RequestStatus;
use crate::utils::api_response::ApiResponse;

pub type Result<T> = std::result::Result<T, RequestError>;

#[derive(Debug, Error)]
pub enum RequestError {
    /// A required field was missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// Missing or wrong admin credential.
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Request {0} not found")]
    NotFound(i32),

    /// The request has already left the pending state.
    #[error("Request {id} is already {status}")]
    Conflict { id: i32, status: RequestStatus },

    /// Any persistence failure; the driver message is passed through.
    #[error("{0}")]
    Storage(String),
}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::Validation(_) => StatusCode::BAD_REQUEST,
            RequestError::Unauthorized => StatusCode::UNAUTHORIZED,
            RequestError::NotFound(_) => StatusCode::NOT_FOUND,
            RequestError::Conflict { .. } => StatusCode::CONFLICT,
            RequestError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for RequestError {
    fn from(e: sqlx::Error) -> Self {
        RequestError::Storage(e.to_string())
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let errors = match &self {
            RequestError::Storage(message) => {
                tracing::error!("Storage failure: {}", message);
                Some(json!({ "error": message }))
            }
            RequestError::Conflict { status, .. } => Some(json!({ "status": status })),
            _ => None,
        };
        ApiResponse::<()>::error(status, self.to_string(), errors).into_response()
    }
}
