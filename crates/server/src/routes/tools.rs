//! HTTP transport for the transport-agnostic tool surface (spec.md §6):
//! `list_tenants`, `find_tenant`, `describe_tenant`, `root_search`,
//! `root_fetch`, plus the supplemental `sync/trigger` operational endpoint
//! gated by `operation_mode` (spec.md §6's offline/online switch).

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use docsearch_tenant::FetchMode;
use serde::Deserialize;
use serde_json::json;

use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;

pub async fn list_tenants(State(state): State<Arc<ServerState>>) -> ServerResult<impl IntoResponse> {
    Ok(Json(state.dispatcher.list_tenants()))
}

#[derive(Debug, Deserialize)]
pub struct FindTenantQuery {
    pub query: String,
}

pub async fn find_tenant(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<FindTenantQuery>,
) -> ServerResult<impl IntoResponse> {
    let hits = state.dispatcher.find_tenant(&params.query)?;
    Ok(Json(hits))
}

pub async fn describe_tenant(
    State(state): State<Arc<ServerState>>,
    Path(codename): Path<String>,
) -> ServerResult<impl IntoResponse> {
    let description = state.dispatcher.describe_tenant(&codename)?;
    Ok(Json(description))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    #[serde(default)]
    pub size: Option<usize>,
    #[serde(default)]
    pub word_match: bool,
}

const DEFAULT_SEARCH_SIZE: usize = 10;

pub async fn root_search(
    State(state): State<Arc<ServerState>>,
    Path(codename): Path<String>,
    Query(params): Query<SearchQuery>,
) -> ServerResult<impl IntoResponse> {
    let size = params.size.unwrap_or(DEFAULT_SEARCH_SIZE);
    let response = state
        .dispatcher
        .root_search(&codename, &params.query, size, params.word_match)?;
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
pub struct FetchQuery {
    pub uri: String,
    #[serde(default)]
    pub mode: Option<FetchMode>,
    #[serde(default)]
    pub query_hint: Option<String>,
}

pub async fn root_fetch(
    State(state): State<Arc<ServerState>>,
    Path(codename): Path<String>,
    Query(params): Query<FetchQuery>,
) -> ServerResult<impl IntoResponse> {
    let mode = params.mode.unwrap_or(state.config.infrastructure.default_fetch_mode);
    let response = state
        .dispatcher
        .root_fetch(&codename, &params.uri, mode, params.query_hint.as_deref())?;
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
pub struct TriggerSyncRequest {
    #[serde(default)]
    pub force_full: bool,
}

/// Mutating endpoint; disabled with 503 when `operation_mode = offline`
/// (spec.md §6: "offline disables all endpoints that mutate state").
pub async fn trigger_sync(
    State(state): State<Arc<ServerState>>,
    Path(codename): Path<String>,
    Json(body): Json<TriggerSyncRequest>,
) -> ServerResult<impl IntoResponse> {
    state.assert_online()?;
    let result = state
        .dispatcher
        .trigger_sync(&codename, body.force_full)?
        .ok_or_else(|| ServerError::NotSupported(format!("tenant {codename:?} has no sync delegate")))?;
    Ok(Json(json!(result)))
}
