//! Root-level tool surface (C7): a registry of tenant runtimes plus
//! `list_tenants`/`find_tenant`/`describe_tenant`/`root_search`/`root_fetch`
//! routing, request-lifecycle tracking, and the boot-time background audit.

mod error;
mod fuzzy;
mod registry;
mod types;

pub use error::DispatcherError;
pub use registry::Dispatcher;
pub use types::{RequestLifecycle, RequestState, TenantSummary};
