use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use docsearch_dispatcher::DispatcherError;
use docsearch_tenant::TenantError;
use serde::{Deserialize, Serialize};
use serde_json::json;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types, mapping the tool-surface errors of spec.md §7 onto
/// HTTP status codes and a stable `error.code` string.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("no tenant named {requested:?}; available: {}", available.join(", "))]
    TenantNotFound {
        requested: String,
        available: Vec<String>,
    },

    #[error("tenant has no published segment yet")]
    TenantNotReady,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("operation not supported: {0}")]
    NotSupported(String),

    #[error("index is corrupt: {0}")]
    IndexCorrupt(String),

    #[error("offline mode: {0}")]
    Offline(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("internal server error: {0}")]
    Internal(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// API error response structure, `error` populated from the same status/code
/// mapping used by the tool-surface `error` channel (spec.md §6).
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::InvalidArgument(_) | ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::TenantNotFound { .. } | ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::TenantNotReady => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::NotSupported(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::IndexCorrupt(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Offline(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::Internal(_) | ServerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ServerError::InvalidArgument(_) => "INVALID_ARGUMENT",
            ServerError::TenantNotFound { .. } => "TENANT_NOT_FOUND",
            ServerError::TenantNotReady => "TENANT_NOT_READY",
            ServerError::NotFound(_) => "NOT_FOUND",
            ServerError::NotSupported(_) => "NOT_SUPPORTED",
            ServerError::IndexCorrupt(_) => "INDEX_CORRUPT",
            ServerError::Offline(_) => "OFFLINE",
            ServerError::BadRequest(_) => "BAD_REQUEST",
            ServerError::Internal(_) => "INTERNAL_ERROR",
            ServerError::Config(_) => "CONFIG_ERROR",
        }
    }
}

impl From<DispatcherError> for ServerError {
    fn from(err: DispatcherError) -> Self {
        match err {
            DispatcherError::TenantNotFound { requested, available } => {
                ServerError::TenantNotFound { requested, available }
            }
            DispatcherError::InvalidArgument(msg) => ServerError::InvalidArgument(msg),
            DispatcherError::Tenant(tenant_err) => tenant_err.into(),
        }
    }
}

impl From<TenantError> for ServerError {
    fn from(err: TenantError) -> Self {
        match err {
            TenantError::InvalidArgument(msg) => ServerError::InvalidArgument(msg),
            TenantError::TenantNotReady => ServerError::TenantNotReady,
            TenantError::IndexCorrupt(e) => ServerError::IndexCorrupt(e.to_string()),
            TenantError::NotFound(uri) => ServerError::NotFound(uri),
            TenantError::NotSupported(msg) => ServerError::NotSupported(msg),
            TenantError::Scorer(e) => ServerError::Internal(e.to_string()),
            TenantError::Indexer(e) => ServerError::Internal(e.to_string()),
            TenantError::Io { path, source } => {
                ServerError::Internal(format!("io error at {}: {source}", path.display()))
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code().to_string();
        let message = self.to_string();

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

impl From<std::net::AddrParseError> for ServerError {
    fn from(err: std::net::AddrParseError) -> Self {
        ServerError::Config(format!("invalid address: {err}"))
    }
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Internal(format!("io error: {err}"))
    }
}

impl From<serde_json::Error> for ServerError {
    fn from(err: serde_json::Error) -> Self {
        ServerError::BadRequest(format!("json parse error: {err}"))
    }
}

impl From<anyhow::Error> for ServerError {
    fn from(err: anyhow::Error) -> Self {
        ServerError::Internal(err.to_string())
    }
}
