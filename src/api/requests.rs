use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use utoipa::OpenApi;

use crate::app_state::AppState;
use crate::db::models::requests::{Decision, NewRequest, Request, RequestStatus};
use crate::error::RequestError;
use crate::middleware::auth::AdminCredential;
use crate::utils::api_response::ApiResponse;

pub fn request_routes() -> Router<AppState> {
    Router::new()
        .route("/api/requests", get(list_requests).post(submit_request))
        .route("/api/requests/{request_id}/approve", post(approve_request))
        .route("/api/requests/{request_id}/reject", post(reject_request))
}

#[utoipa::path(
    get,
    path = "/api/requests",
    responses(
        (status = 200, description = "All requests, newest first", body = Vec<Request>),
        (status = 500, description = "Failed to retrieve requests")
    ),
    tag = "Requests"
)]
pub async fn list_requests(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<Request>>, RequestError> {
    let requests = state.service.list().await?;
    Ok(ApiResponse::success(StatusCode::OK, "Requests retrieved", requests))
}

#[utoipa::path(
    post,
    path = "/api/requests",
    request_body = NewRequest,
    responses(
        (status = 201, description = "Request submitted", body = Request),
        (status = 400, description = "name is required"),
        (status = 500, description = "Failed to insert request")
    ),
    tag = "Requests"
)]
pub async fn submit_request(
    State(state): State<AppState>,
    payload: Result<Json<NewRequest>, JsonRejection>,
) -> Result<ApiResponse<Request>, RequestError> {
    let Json(payload) = payload.map_err(|e| RequestError::Validation(e.body_text()))?;
    let request = state
        .service
        .submit(payload.name.as_deref(), payload.info.as_deref())
        .await?;
    Ok(ApiResponse::success(StatusCode::CREATED, "Request submitted", request))
}

#[utoipa::path(
    post,
    path = "/api/requests/{request_id}/approve",
    params(
        ("request_id" = i32, Path, description = "Request ID")
    ),
    responses(
        (status = 200, description = "Request approved", body = Request),
        (status = 401, description = "Missing or invalid admin token"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request already decided")
    ),
    tag = "Requests",
    security(("adminToken" = []))
)]
pub async fn approve_request(
    State(state): State<AppState>,
    credential: AdminCredential,
    request_id: Result<Path<i32>, PathRejection>,
) -> Result<ApiResponse<Request>, RequestError> {
    decide(&state, credential, request_id, Decision::Approve).await
}

#[utoipa::path(
    post,
    path = "/api/requests/{request_id}/reject",
    params(
        ("request_id" = i32, Path, description = "Request ID")
    ),
    responses(
        (status = 200, description = "Request rejected", body = Request),
        (status = 401, description = "Missing or invalid admin token"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request already decided")
    ),
    tag = "Requests",
    security(("adminToken" = []))
)]
pub async fn reject_request(
    State(state): State<AppState>,
    credential: AdminCredential,
    request_id: Result<Path<i32>, PathRejection>,
) -> Result<ApiResponse<Request>, RequestError> {
    decide(&state, credential, request_id, Decision::Reject).await
}

async fn decide(
    state: &AppState,
    credential: AdminCredential,
    request_id: Result<Path<i32>, PathRejection>,
    decision: Decision,
) -> Result<ApiResponse<Request>, RequestError> {
    let Path(request_id) = request_id.map_err(|e| RequestError::Validation(e.body_text()))?;
    let request = state
        .service
        .decide(request_id, decision, credential.as_deref())
        .await?;

    let message = match decision {
        Decision::Approve => "Request approved",
        Decision::Reject => "Request rejected",
    };
    Ok(ApiResponse::success(StatusCode::OK, message, request))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list_requests,
        submit_request,
        approve_request,
        reject_request
    ),
    components(schemas(Request, NewRequest, RequestStatus)),
    modifiers(&AdminTokenScheme),
    tags(
        (name = "Requests", description = "Submit requests and record admin decisions")
    )
)]
pub struct RequestDoc;

struct AdminTokenScheme;

impl utoipa::Modify for AdminTokenScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};

        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "adminToken",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-Admin-Token"))),
        );
    }
}
