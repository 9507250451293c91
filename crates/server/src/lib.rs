//! docsearch-server — HTTP transport for the multi-tenant documentation
//! search service's transport-agnostic tool surface (spec.md §6).
//!
//! # Endpoints
//!
//! - `GET /` — service info
//! - `GET /health` / `GET /ready` / `GET /metrics` — liveness, readiness
//!   (per-tenant residency and last-sync state), and metrics
//! - `GET /tenants` — `list_tenants`
//! - `GET /tenants/find?query=` — `find_tenant`
//! - `GET /tenants/{codename}` — `describe_tenant`
//! - `GET /tenants/{codename}/search?query=&size=&word_match=` — `root_search`
//! - `GET /tenants/{codename}/fetch?uri=&mode=` — `root_fetch`
//! - `POST /tenants/{codename}/sync/trigger` — mutating; 503 in offline mode
//!
//! # Quick start
//!
//! ```rust,no_run
//! use server::AppConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::AppConfig;
pub use error::{ServerError, ServerResult};
pub use server::start_server;
pub use state::ServerState;
