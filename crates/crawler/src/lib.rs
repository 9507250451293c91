//! Crawler concurrency core (C9): the adaptive worker pool, cross-process
//! lease lock, and per-host rate limiter that any crawler-backed sync
//! runtime is built from. The document normalizer itself (what actually
//! fetches and parses a URL) is an external collaborator injected via
//! [`Fetcher`] (spec.md §6).

mod crawl;
mod error;
mod fetcher;
mod lease;
mod limiter;
mod rate_limiter;

pub use crawl::{run_crawl, CrawlConfig, CrawlReport};
pub use error::CrawlerError;
pub use fetcher::{host_of, FetchOutcome, FetchedDocument, Fetcher};
pub use lease::{is_held, lease_path, Lease, DEFAULT_TTL_SECONDS, MIN_TTL_SECONDS};
pub use limiter::{
    AdaptiveLimiter, Permit, DEFAULT_MAX_CONCURRENCY, DEFAULT_MAX_SESSIONS, DEFAULT_MIN_CONCURRENCY,
};
pub use rate_limiter::HostRateLimiter;
