use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Admin credential presented by the caller, if any.
///
/// Read from `X-Admin-Token`, falling back to `Authorization: Bearer <token>`.
/// Extraction never fails; whether the credential is valid is decided by
/// `RequestService`, so a missing header just yields `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminCredential(pub Option<String>);

impl AdminCredential {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let token = headers
            .get(ADMIN_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .or_else(|| {
                headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.strip_prefix("Bearer "))
                    .map(str::trim)
            })
            .map(str::to_string);
        AdminCredential(token)
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for AdminCredential
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}
