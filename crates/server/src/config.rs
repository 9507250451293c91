//! Declarative configuration (spec.md §6): a single document rejected on
//! unknown fields, loaded as YAML with environment overrides layered on top
//! the way the teacher's `ServerConfig::load` layers `.env` over `server.*`.

use std::collections::HashMap;
use std::path::PathBuf;

use docsearch_scorer::SearchConfig;
use docsearch_tenant::SourceKind;
use serde::{Deserialize, Serialize};

use crate::error::ServerError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OperationMode {
    Online,
    Offline,
}

impl Default for OperationMode {
    fn default() -> Self {
        OperationMode::Online
    }
}

impl OperationMode {
    /// Offline disables every endpoint that mutates state (spec.md §6).
    pub fn allows_mutation(self) -> bool {
        matches!(self, OperationMode::Online)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InfrastructureConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub operation_mode: OperationMode,
    #[serde(default = "default_http_timeout_s")]
    pub http_timeout_s: u64,
    #[serde(default = "default_search_timeout_s")]
    pub search_timeout_s: u64,
    #[serde(default = "default_true")]
    pub search_include_stats: bool,
    #[serde(default)]
    pub default_fetch_mode: docsearch_tenant::FetchMode,
    #[serde(default = "default_surrounding_chars")]
    pub default_fetch_surrounding_chars: usize,
    #[serde(default = "default_min_concurrency")]
    pub crawler_min_concurrency: usize,
    #[serde(default = "default_max_concurrency")]
    pub crawler_max_concurrency: usize,
    #[serde(default = "default_max_sessions")]
    pub crawler_max_sessions: usize,
    #[serde(default = "default_lock_ttl")]
    pub crawler_lock_ttl_seconds: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_profiles: Vec<String>,
}

impl Default for InfrastructureConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            operation_mode: OperationMode::default(),
            http_timeout_s: default_http_timeout_s(),
            search_timeout_s: default_search_timeout_s(),
            search_include_stats: default_true(),
            default_fetch_mode: docsearch_tenant::FetchMode::default(),
            default_fetch_surrounding_chars: default_surrounding_chars(),
            crawler_min_concurrency: default_min_concurrency(),
            crawler_max_concurrency: default_max_concurrency(),
            crawler_max_sessions: default_max_sessions(),
            crawler_lock_ttl_seconds: default_lock_ttl(),
            log_level: default_log_level(),
            log_profiles: Vec::new(),
        }
    }
}

impl InfrastructureConfig {
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.crawler_lock_ttl_seconds < 60 {
            return Err(ServerError::Config(
                "infrastructure.crawler_lock_ttl_seconds must be >= 60".into(),
            ));
        }
        if self.crawler_min_concurrency == 0 {
            return Err(ServerError::Config(
                "infrastructure.crawler_min_concurrency must be >= 1".into(),
            ));
        }
        if self.crawler_max_concurrency < self.crawler_min_concurrency {
            return Err(ServerError::Config(
                "infrastructure.crawler_max_concurrency must be >= crawler_min_concurrency".into(),
            ));
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<std::net::SocketAddr, ServerError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| ServerError::Config(format!("invalid address: {e}")))
    }
}

/// One `tenants[]` entry (spec.md §6). Source-specific fields are optional
/// and only meaningful for the matching `source_type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TenantEntryConfig {
    pub codename: String,
    pub docs_name: String,
    #[serde(default)]
    pub description: String,
    pub source_type: SourceKind,
    pub docs_root_dir: PathBuf,
    #[serde(default)]
    pub refresh_schedule: Option<String>,
    #[serde(default)]
    pub test_queries: Vec<String>,
    #[serde(default)]
    pub search: SearchConfig,

    // `online` source fields
    #[serde(default)]
    pub seed_urls: Vec<String>,
    #[serde(default)]
    pub whitelist_prefixes: Vec<String>,
    #[serde(default)]
    pub blacklist_prefixes: Vec<String>,
    #[serde(default)]
    pub crawler_enabled: bool,
    #[serde(default)]
    pub max_pages: Option<u32>,

    // `git` source fields
    #[serde(default)]
    pub repo_url: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub subpaths: Vec<String>,
    #[serde(default)]
    pub strip_prefix: Option<String>,
    #[serde(default)]
    pub auth_env_var: Option<String>,
}

impl TenantEntryConfig {
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.codename.trim().is_empty() {
            return Err(ServerError::Config("tenant codename must not be empty".into()));
        }
        if self.source_type == SourceKind::Online && self.crawler_enabled && self.seed_urls.is_empty() {
            return Err(ServerError::Config(format!(
                "tenant {:?}: crawler_enabled requires at least one seed_url",
                self.codename
            )));
        }
        Ok(())
    }

    /// Derives `describe_tenant`'s `url_prefixes` from the source-specific
    /// config (SPEC_FULL.md A2: spec.md names the field but not its source).
    pub fn url_prefixes(&self) -> Vec<String> {
        match self.source_type {
            SourceKind::Online => self.whitelist_prefixes.clone(),
            SourceKind::Git => self
                .repo_url
                .iter()
                .cloned()
                .chain(self.strip_prefix.clone())
                .collect(),
            SourceKind::Filesystem => vec![self.docs_root_dir.display().to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub infrastructure: InfrastructureConfig,
    #[serde(default)]
    pub tenants: Vec<TenantEntryConfig>,
}

impl AppConfig {
    /// Loads `docsearch.yaml` (or `DOCSEARCH__*` environment overrides) the
    /// way the teacher's `ServerConfig::load` layers `config::Environment`
    /// over a base file.
    pub fn load() -> Result<Self, ServerError> {
        let _ = dotenvy::dotenv();
        let builder = config::Config::builder()
            .add_source(config::File::with_name("docsearch").required(false))
            .add_source(config::Environment::with_prefix("DOCSEARCH").separator("__"));

        let raw: serde_json::Value = builder
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))?;
        let app: AppConfig = serde_json::from_value(raw).map_err(|e| ServerError::Config(e.to_string()))?;
        app.validate()?;
        Ok(app)
    }

    pub fn validate(&self) -> Result<(), ServerError> {
        self.infrastructure.validate()?;
        let mut seen = HashMap::new();
        for tenant in &self.tenants {
            tenant.validate()?;
            if seen.insert(tenant.codename.clone(), ()).is_some() {
                return Err(ServerError::Config(format!(
                    "duplicate tenant codename {:?}",
                    tenant.codename
                )));
            }
        }
        Ok(())
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_http_timeout_s() -> u64 {
    30
}
fn default_search_timeout_s() -> u64 {
    5
}
fn default_true() -> bool {
    true
}
fn default_surrounding_chars() -> usize {
    300
}
fn default_min_concurrency() -> usize {
    5
}
fn default_max_concurrency() -> usize {
    20
}
fn default_max_sessions() -> usize {
    50
}
fn default_lock_ttl() -> u64 {
    180
}
fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_infrastructure_matches_spec_defaults() {
        let infra = InfrastructureConfig::default();
        assert_eq!(infra.port, 8080);
        assert_eq!(infra.crawler_min_concurrency, 5);
        assert_eq!(infra.crawler_max_concurrency, 20);
        assert_eq!(infra.crawler_lock_ttl_seconds, 180);
        assert_eq!(infra.operation_mode, OperationMode::Online);
    }

    #[test]
    fn rejects_lock_ttl_below_60() {
        let mut infra = InfrastructureConfig::default();
        infra.crawler_lock_ttl_seconds = 10;
        assert!(infra.validate().is_err());
    }

    #[test]
    fn rejects_duplicate_tenant_codenames() {
        let tenant = TenantEntryConfig {
            codename: "acme".into(),
            docs_name: "Acme".into(),
            description: String::new(),
            source_type: SourceKind::Filesystem,
            docs_root_dir: PathBuf::from("/tmp/acme"),
            refresh_schedule: None,
            test_queries: vec![],
            search: SearchConfig::default(),
            seed_urls: vec![],
            whitelist_prefixes: vec![],
            blacklist_prefixes: vec![],
            crawler_enabled: false,
            max_pages: None,
            repo_url: None,
            branch: None,
            subpaths: vec![],
            strip_prefix: None,
            auth_env_var: None,
        };
        let cfg = AppConfig {
            infrastructure: InfrastructureConfig::default(),
            tenants: vec![tenant.clone(), tenant],
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn offline_mode_disallows_mutation() {
        assert!(!OperationMode::Offline.allows_mutation());
        assert!(OperationMode::Online.allows_mutation());
    }
}
