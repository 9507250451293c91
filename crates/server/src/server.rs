//! Axum router assembly, startup, and graceful shutdown.
//!
//! Middleware stack (applied in reverse order, outermost first): trace,
//! logging, request ID, CORS, compression, timeout. No authentication or
//! rate limiting layer — the only access-control knob this service exposes
//! is `operation_mode` (spec.md §6), enforced per-handler via
//! [`ServerState::assert_online`].

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;
use docsearch_schema::Schema;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::middleware::{log_requests, request_id};
use crate::routes::{api_info, health, not_found, tools};
use crate::state::ServerState;

fn build_router(state: Arc<ServerState>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    let router = Router::new()
        .route("/", get(api_info))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/metrics", get(health::metrics))
        .route("/tenants", get(tools::list_tenants))
        .route("/tenants/find", get(tools::find_tenant))
        .route("/tenants/{codename}", get(tools::describe_tenant))
        .route("/tenants/{codename}/search", get(tools::root_search))
        .route("/tenants/{codename}/fetch", get(tools::root_fetch))
        .route("/tenants/{codename}/sync/trigger", post(tools::trigger_sync))
        .fallback(not_found);

    router
        .layer(TimeoutLayer::new(Duration::from_secs(state.config.infrastructure.http_timeout_s)))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(from_fn(request_id))
        .layer(from_fn(log_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Boots the dispatcher from `config`, runs the boot-time audit in the
/// background (spec.md §4.7: "audit failures log but never block HTTP
/// readiness"), and serves the router until a shutdown signal arrives.
pub async fn start_server(config: AppConfig) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(&config.infrastructure.log_level)
        .with_target(false)
        .with_thread_ids(true)
        .json()
        .init();

    let metrics_handle = crate::metrics::install_recorder();
    let schema = Schema::documentation_default();
    let state = Arc::new(ServerState::new(config, schema.clone(), metrics_handle)?);

    let audit_dispatcher = state.dispatcher.clone();
    let audit_timeout = Duration::from_secs(state.config.infrastructure.search_timeout_s.max(5));
    tokio::task::spawn_blocking(move || {
        audit_dispatcher.boot_time_audit(&schema, audit_timeout);
    });

    let app = build_router(state.clone());
    let addr: SocketAddr = state.config.infrastructure.socket_addr()?;

    tracing::info!(
        %addr,
        tenants = state.dispatcher.list_tenants().len(),
        operation_mode = ?state.config.infrastructure.operation_mode,
        "starting_docsearch_server"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state.clone()))
        .await?;

    tracing::info!("server_shutdown_complete");
    Ok(())
}

async fn shutdown_signal(state: Arc<ServerState>) {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received_ctrl_c_shutting_down"),
        _ = terminate => tracing::info!("received_sigterm_shutting_down"),
    }

    state.shutdown();
}
