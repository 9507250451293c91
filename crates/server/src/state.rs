//! Shared application state: a registered [`Dispatcher`] plus the
//! schedulers backing it, wired at startup from [`AppConfig`] (spec.md §4.7:
//! "the dispatcher reads a declarative configuration, constructs each
//! tenant runtime, registers it, and starts its scheduler").

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use docsearch_crawler::{CrawlConfig, FetchOutcome, Fetcher};
use docsearch_dispatcher::Dispatcher;
use docsearch_schema::Schema;
use docsearch_scheduler::{Cadence, CrawlerSyncExecutor, FilesystemSyncExecutor, SchedulerRuntime, SyncExecutor};
use docsearch_tenant::{SourceKind, SyncDelegate, TenantConfig, TenantRuntime};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::{info, warn};

use crate::config::{AppConfig, TenantEntryConfig};
use crate::error::{ServerError, ServerResult};

/// A scheduler instance, erased over its `SyncExecutor` so a heterogeneous
/// mix of filesystem- and crawler-backed tenants can be stopped together at
/// shutdown without `ServerState` depending on the executor's concrete type.
pub trait StoppableScheduler: Send + Sync {
    fn stop(&self, timeout: Duration);
    fn initialize(&self);
}

impl<E: SyncExecutor + 'static> StoppableScheduler for SchedulerRuntime<E> {
    fn stop(&self, timeout: Duration) {
        SchedulerRuntime::stop(self, timeout)
    }

    fn initialize(&self) {
        let _ = SchedulerRuntime::initialize(self);
    }
}

/// The `fetch(url) -> Document` document normalizer is an external
/// collaborator (spec.md §6); this crate never speaks HTTP on its behalf.
/// Deployments that enable `crawler_enabled` for an `online` tenant must
/// inject a real [`Fetcher`] ahead of this one — until then, sync attempts
/// fail loudly rather than silently doing nothing.
struct UnconfiguredFetcher;

impl Fetcher for UnconfiguredFetcher {
    fn fetch(&self, _url: &str) -> FetchOutcome {
        FetchOutcome::Failed("no document normalizer configured for this tenant".to_string())
    }
}

pub struct ServerState {
    pub config: Arc<AppConfig>,
    pub dispatcher: Arc<Dispatcher>,
    pub schedulers: Vec<Arc<dyn StoppableScheduler>>,
    pub start_time: SystemTime,
    pub metrics_handle: PrometheusHandle,
}

impl ServerState {
    pub fn new(config: AppConfig, schema: Schema, metrics_handle: PrometheusHandle) -> ServerResult<Self> {
        config.validate()?;

        let mut dispatcher = Dispatcher::new();
        let mut schedulers: Vec<Arc<dyn StoppableScheduler>> = Vec::new();

        for entry in &config.tenants {
            let tenant_config = build_tenant_config(entry);
            let mut runtime = TenantRuntime::new(tenant_config, schema.clone());

            let cadence = entry
                .refresh_schedule
                .as_deref()
                .and_then(|expr| match Cadence::parse(expr) {
                    Ok(c) => Some(c),
                    Err(e) => {
                        warn!(tenant = %entry.codename, error = %e, "tenant_cadence_parse_failed");
                        None
                    }
                });
            let lock_ttl = Duration::from_secs(config.infrastructure.crawler_lock_ttl_seconds);

            match entry.source_type {
                SourceKind::Online if entry.crawler_enabled => {
                    let crawl_config = CrawlConfig {
                        min_concurrency: config.infrastructure.crawler_min_concurrency,
                        max_concurrency: config.infrastructure.crawler_max_concurrency,
                        max_sessions: config.infrastructure.crawler_max_sessions,
                        ..CrawlConfig::default()
                    };
                    let executor = CrawlerSyncExecutor {
                        seed_urls: entry.seed_urls.clone(),
                        fetcher: Arc::new(UnconfiguredFetcher),
                        crawl_config,
                    };
                    let mut scheduler = SchedulerRuntime::new(
                        entry.docs_root_dir.clone(),
                        schema.clone(),
                        executor,
                        format!("docsearch-server:{}", entry.codename),
                    )
                    .with_lease_ttl(lock_ttl);
                    if let Some(cadence) = cadence {
                        scheduler = scheduler.with_cadence(cadence);
                    }
                    let scheduler = Arc::new(scheduler);
                    runtime = runtime.with_sync_delegate(scheduler.clone() as Arc<dyn SyncDelegate>);
                    schedulers.push(scheduler);
                }
                SourceKind::Online | SourceKind::Git | SourceKind::Filesystem => {
                    let mut scheduler = SchedulerRuntime::new(
                        entry.docs_root_dir.clone(),
                        schema.clone(),
                        FilesystemSyncExecutor,
                        format!("docsearch-server:{}", entry.codename),
                    )
                    .with_lease_ttl(lock_ttl);
                    if let Some(cadence) = cadence {
                        scheduler = scheduler.with_cadence(cadence);
                    }
                    let scheduler = Arc::new(scheduler);
                    runtime = runtime.with_sync_delegate(scheduler.clone() as Arc<dyn SyncDelegate>);
                    schedulers.push(scheduler);
                }
            }

            dispatcher.register(Arc::new(runtime));
        }

        for scheduler in &schedulers {
            scheduler.initialize();
        }

        info!(tenants = config.tenants.len(), "server_state_initialized");

        Ok(Self {
            config: Arc::new(config),
            dispatcher: Arc::new(dispatcher),
            schedulers,
            start_time: SystemTime::now(),
            metrics_handle,
        })
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().map(|d| d.as_secs()).unwrap_or(0)
    }

    /// Drains schedulers on shutdown (spec.md §4.7: "stops each scheduler,
    /// then closes each segment" — closing happens implicitly when the
    /// last `Arc<SegmentReader>` clone is dropped).
    pub fn shutdown(&self) {
        for scheduler in &self.schedulers {
            scheduler.stop(Duration::from_secs(self.config.infrastructure.http_timeout_s));
        }
    }

    pub fn assert_online(&self) -> ServerResult<()> {
        if !self.config.infrastructure.operation_mode.allows_mutation() {
            return Err(ServerError::Offline(
                "this endpoint mutates state and is disabled in offline mode".into(),
            ));
        }
        Ok(())
    }
}

fn build_tenant_config(entry: &TenantEntryConfig) -> TenantConfig {
    TenantConfig {
        codename: entry.codename.clone(),
        display_name: entry.docs_name.clone(),
        description: entry.description.clone(),
        source_kind: entry.source_type,
        docs_root_dir: entry.docs_root_dir.clone(),
        example_queries: entry.test_queries.clone(),
        url_prefixes: entry.url_prefixes(),
        search: entry.search.clone(),
    }
}
