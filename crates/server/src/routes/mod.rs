//! API route handlers.
//!
//! - `health`: liveness/readiness/metrics
//! - `tools`: the tool surface (`list_tenants`, `find_tenant`,
//!   `describe_tenant`, `root_search`, `root_fetch`) plus `sync/trigger`

pub mod health;
pub mod tools;

use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::error::{ServerError, ServerResult};

/// Root endpoint: service info, no auth required.
pub async fn api_info() -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "docsearch-server",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/tenants",
            "/tenants/find",
            "/tenants/{codename}",
            "/tenants/{codename}/search",
            "/tenants/{codename}/fetch",
            "/tenants/{codename}/sync/trigger",
            "/health",
            "/ready",
            "/metrics"
        ]
    })))
}

pub async fn not_found() -> ServerError {
    ServerError::NotFound("no route matches this path".to_string())
}
