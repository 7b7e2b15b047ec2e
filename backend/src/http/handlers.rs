//! HTTP handlers for the REST API.
//!
//! Discovery endpoints read the registry directly; calls go through the
//! [`Dispatcher`] on the blocking thread pool.

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value as JsonValue};

use super::dto::{HealthResponse, IndexResponse};
use super::error::AppError;
use super::state::AppState;
use crate::dispatch::Dispatcher;
use crate::error::ElephantError;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// GET /
pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        elephant: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
    })
}

/// GET /api
///
/// Names of all registered modules, sorted.
pub async fn list_modules(State(state): State<AppState>) -> Json<Vec<&'static str>> {
    Json(state.registry.modules())
}

/// GET /api/{module}
///
/// Names of the functions in `module`, sorted.
pub async fn list_functions(
    State(state): State<AppState>,
    Path(module): Path<String>,
) -> HandlerResult<Vec<&'static str>> {
    Ok(Json(state.registry.functions(&module)?))
}

/// GET|POST /api/{module}/{call}
///
/// Run one call round trip. An empty body is the same as `{}`.
pub async fn call_function(
    State(state): State<AppState>,
    Path((module, call)): Path<(String, String)>,
    body: Bytes,
) -> HandlerResult<JsonValue> {
    let body = parse_body(&body)?;
    tracing::debug!(%module, %call, "dispatching call");

    let result = tokio::task::spawn_blocking(move || {
        Dispatcher::with_default_units(&state.registry, state.default_units.clone()).handle(&module, &call, body)
    })
    .await
    .map_err(|e| ElephantError::Internal(format!("Task join error: {}", e)))??;

    Ok(Json(result))
}

fn parse_body(body: &[u8]) -> Result<JsonValue, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(json!({}));
    }
    Ok(serde_json::from_slice(body)?)
}
