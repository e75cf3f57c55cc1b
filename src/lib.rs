//! Request desk: submit named requests, list them, and let an admin approve
//! or reject each one exactly once.

pub mod api;
pub mod app_state;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod service;
pub mod utils;

use axum::middleware::from_fn;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::requests::RequestDoc;
use crate::app_state::AppState;
use crate::middleware::request_logger::log_requests;

/// Build the full HTTP application around `state`.
pub fn app(state: AppState) -> Router {
    let doc = RequestDoc::openapi();

    Router::new()
        .merge(api::health::health_routes())
        .merge(api::requests::request_routes())
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", doc.clone()))
        .merge(RapiDoc::with_openapi("/api-docs/rapidoc.json", doc).path("/rapidoc"))
        .layer(from_fn(log_requests))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
