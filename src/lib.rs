//! Workspace umbrella crate for the multi-tenant documentation search
//! service.
//!
//! `docsearch` re-exports the schema, segment, scorer, indexer, tenant,
//! dispatcher, scheduler, and crawler layers so applications that want the
//! full stack without wiring each crate by hand can depend on this one
//! instead. The HTTP transport (`docsearch-server`) is a separate binary
//! crate and is not re-exported here — this crate is the embeddable library
//! surface; `docsearch-server` is the deployable service built on top of it.
//!
//! ## Quick start
//!
//! Building a segment for a single tenant directory and running a search
//! end to end:
//!
//! ```ignore
//! use docsearch::{Schema, TenantConfig, TenantRuntime, SourceKind, SearchConfig};
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let schema = Schema::documentation_default();
//! let config = TenantConfig {
//!     codename: "acme".into(),
//!     display_name: "Acme Docs".into(),
//!     description: "Acme's documentation".into(),
//!     source_kind: SourceKind::Filesystem,
//!     docs_root_dir: PathBuf::from("./docs"),
//!     example_queries: vec!["getting started".into()],
//!     url_prefixes: vec![],
//!     search: SearchConfig::default(),
//! };
//!
//! let runtime = Arc::new(TenantRuntime::new(config, schema.clone()));
//! runtime.refresh()?;
//! let hits = runtime.search("installation", 10, false)?;
//! # let _ = hits;
//! # Ok(())
//! # }
//! ```
//!
//! Registering several tenants behind a single [`Dispatcher`] is how
//! `docsearch-server` itself is built; see that crate for the HTTP layer.

pub use docsearch_crawler::{
    host_of, run_crawl, CrawlConfig, CrawlReport, CrawlerError, FetchOutcome, FetchedDocument,
    Fetcher, HostRateLimiter, Lease,
};
pub use docsearch_dispatcher::{Dispatcher, DispatcherError, RequestLifecycle, TenantSummary};
pub use docsearch_indexer::{
    audit, audit_with_timeout, build_segment, AuditOutcome, AuditReport, IndexerError, Manifest,
};
pub use docsearch_schema::{Document, Schema, SchemaError};
pub use docsearch_scheduler::{
    Cadence, CrawlerSyncExecutor, FilesystemSyncExecutor, SchedulerError, SchedulerRuntime,
    SyncExecutor,
};
pub use docsearch_scorer::{RankingConfig, ScoredHit, ScorerError, SearchConfig};
pub use docsearch_segment::{SegmentBuilder, SegmentError, SegmentReader};
pub use docsearch_tenant::{
    DescribeResponse, FetchMode, FetchResponse, SearchHit, SearchResponse, SourceKind,
    SyncDelegate, SyncTriggerResult, TenantConfig, TenantError, TenantHealth, TenantRuntime,
};
