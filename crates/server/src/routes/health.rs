use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::error::ServerResult;
use crate::state::ServerState;

/// Liveness probe: the process is up. Never touches tenant state.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "docsearch-server",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Readiness probe: reports per-tenant residency and last-sync state
/// (spec.md §4.5: "publishes residency and last-sync state to the
/// dispatcher's health endpoint").
pub async fn readiness_check(State(state): State<Arc<ServerState>>) -> ServerResult<impl IntoResponse> {
    let tenants = state.dispatcher.tenant_health();

    Ok(Json(json!({
        "status": "ready",
        "service": "docsearch-server",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": state.uptime_seconds(),
        "operation_mode": state.config.infrastructure.operation_mode,
        "tenants": tenants,
    })))
}

/// Prometheus scrape point (spec.md §6 names metrics exporters as an
/// ambient concern): renders whatever the process-global recorder has
/// accumulated as Prometheus text exposition.
pub async fn metrics(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics_handle.render(),
    )
}
