use docsearch_tenant::TenantError;
use thiserror::Error;

/// Root-level tool errors (spec.md §4.6/§7). Per-tenant errors bubble up
/// through [`DispatcherError::Tenant`] unchanged.
#[derive(Debug, Error)]
pub enum DispatcherError {
    #[error("no tenant named {requested:?}; available: {}", available.join(", "))]
    TenantNotFound {
        requested: String,
        available: Vec<String>,
    },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Tenant(#[from] TenantError),
}
