//! Drives a queue of URLs through the adaptive limiter, per-host rate
//! limiter, and retry/backoff policy (spec.md §4.9), calling into an
//! injected [`Fetcher`].

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::Rng;
use tracing::{info, warn};

use crate::fetcher::{host_of, FetchOutcome, FetchedDocument, Fetcher};
use crate::limiter::AdaptiveLimiter;
use crate::rate_limiter::HostRateLimiter;

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub min_concurrency: usize,
    pub max_concurrency: usize,
    pub max_sessions: usize,
    pub host_rate_per_sec: f64,
    pub host_burst: f64,
    pub retry_max_attempts: u32,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            min_concurrency: crate::limiter::DEFAULT_MIN_CONCURRENCY,
            max_concurrency: crate::limiter::DEFAULT_MAX_CONCURRENCY,
            max_sessions: crate::limiter::DEFAULT_MAX_SESSIONS,
            host_rate_per_sec: 5.0,
            host_burst: 5.0,
            retry_max_attempts: 3,
        }
    }
}

#[derive(Debug, Default)]
pub struct CrawlReport {
    pub fetched: Vec<FetchedDocument>,
    pub attempted: usize,
    pub failed: usize,
    pub throttle_events: u32,
    pub final_concurrency_limit: usize,
}

fn backoff_with_jitter(attempt: u32) -> Duration {
    let base_ms = 100u64.saturating_mul(1u64 << attempt.min(10));
    let jitter_ms = rand::rng().random_range(0..=base_ms / 2 + 1);
    Duration::from_millis(base_ms + jitter_ms)
}

/// Runs the crawl to completion (or until `cancel` is set). Workers must
/// not start a new fetch once `cancel` is observed true — the in-flight
/// fetch still finishes (spec.md §4.9 "Cancellation and shutdown").
pub fn run_crawl(
    urls: Vec<String>,
    fetcher: Arc<dyn Fetcher>,
    config: &CrawlConfig,
    cancel: Arc<AtomicBool>,
) -> CrawlReport {
    let limiter = Arc::new(AdaptiveLimiter::new(
        config.min_concurrency,
        config.max_concurrency,
        config.max_sessions,
    ));
    let rate_limiter = Arc::new(HostRateLimiter::new(config.host_rate_per_sec, config.host_burst));
    let queue = Arc::new(Mutex::new(VecDeque::from(urls)));
    let fetched = Arc::new(Mutex::new(Vec::new()));
    let attempted = Arc::new(AtomicU32::new(0));
    let failed = Arc::new(AtomicU32::new(0));
    let throttle_events = Arc::new(AtomicU32::new(0));
    let retry_max_attempts = config.retry_max_attempts.max(1);

    // Spawn enough workers that the limiter's ramp can actually be felt: if
    // we only ever spawned `min_concurrency` threads, `limiter.acquire()`
    // would never admit more than that no matter how far `on_success` raises
    // the limit. Workers block in `acquire()`, so admitted concurrency is
    // governed by the limiter, not by how many threads exist.
    let worker_count = config.max_concurrency.max(config.min_concurrency).min(config.max_sessions).max(1);
    let mut handles = Vec::with_capacity(worker_count);
    for _ in 0..worker_count {
        let queue = Arc::clone(&queue);
        let fetcher = Arc::clone(&fetcher);
        let limiter = Arc::clone(&limiter);
        let rate_limiter = Arc::clone(&rate_limiter);
        let fetched = Arc::clone(&fetched);
        let attempted = Arc::clone(&attempted);
        let failed = Arc::clone(&failed);
        let throttle_events = Arc::clone(&throttle_events);
        let cancel = Arc::clone(&cancel);

        handles.push(std::thread::spawn(move || loop {
            if cancel.load(Ordering::SeqCst) {
                return;
            }
            let url = {
                let mut q = queue.lock().unwrap();
                q.pop_front()
            };
            let Some(url) = url else { return };

            attempted.fetch_add(1, Ordering::SeqCst);
            rate_limiter.throttle(&host_of(&url));

            let mut last_error = None;
            let mut succeeded = false;
            for attempt in 0..retry_max_attempts {
                let _permit = limiter.acquire();
                match fetcher.fetch(&url) {
                    FetchOutcome::Success(doc) => {
                        limiter.on_success();
                        fetched.lock().unwrap().push(doc);
                        succeeded = true;
                        break;
                    }
                    FetchOutcome::Throttled => {
                        limiter.on_throttled();
                        throttle_events.fetch_add(1, Ordering::SeqCst);
                        last_error = Some("throttled".to_string());
                    }
                    FetchOutcome::Failed(reason) => {
                        warn!(url = %url, attempt, error = %reason, "crawler_fetch_failed");
                        last_error = Some(reason);
                    }
                }
                if attempt + 1 < retry_max_attempts {
                    std::thread::sleep(backoff_with_jitter(attempt));
                }
            }
            if !succeeded {
                failed.fetch_add(1, Ordering::SeqCst);
                warn!(url = %url, error = ?last_error, "crawler_fetch_exhausted_retries");
            }
        }));
    }

    for handle in handles {
        let _ = handle.join();
    }

    let report = CrawlReport {
        fetched: Arc::try_unwrap(fetched).unwrap().into_inner().unwrap(),
        attempted: attempted.load(Ordering::SeqCst) as usize,
        failed: failed.load(Ordering::SeqCst) as usize,
        throttle_events: throttle_events.load(Ordering::SeqCst),
        final_concurrency_limit: limiter.current_limit(),
    };
    info!(
        attempted = report.attempted,
        fetched = report.fetched.len(),
        failed = report.failed,
        throttle_events = report.throttle_events,
        "crawl_complete"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysSucceeds;
    impl Fetcher for AlwaysSucceeds {
        fn fetch(&self, url: &str) -> FetchOutcome {
            FetchOutcome::Success(FetchedDocument {
                key: url.to_string(),
                title: "ok".into(),
                body: "body".into(),
            })
        }
    }

    struct FailsThenSucceeds {
        calls: Mutex<u32>,
    }
    impl Fetcher for FailsThenSucceeds {
        fn fetch(&self, _url: &str) -> FetchOutcome {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            if *calls < 2 {
                FetchOutcome::Failed("transient".into())
            } else {
                FetchOutcome::Success(FetchedDocument {
                    key: "k".into(),
                    title: "t".into(),
                    body: "b".into(),
                })
            }
        }
    }

    struct AlwaysThrottled;
    impl Fetcher for AlwaysThrottled {
        fn fetch(&self, _url: &str) -> FetchOutcome {
            FetchOutcome::Throttled
        }
    }

    #[test]
    fn all_urls_fetched_on_success() {
        let urls: Vec<String> = (0..10).map(|i| format!("https://example.com/{i}")).collect();
        let report = run_crawl(
            urls,
            Arc::new(AlwaysSucceeds),
            &CrawlConfig::default(),
            Arc::new(AtomicBool::new(false)),
        );
        assert_eq!(report.fetched.len(), 10);
        assert_eq!(report.failed, 0);
    }

    #[test]
    fn retries_recover_a_transient_failure() {
        let report = run_crawl(
            vec!["https://example.com/a".to_string()],
            Arc::new(FailsThenSucceeds { calls: Mutex::new(0) }),
            &CrawlConfig::default(),
            Arc::new(AtomicBool::new(false)),
        );
        assert_eq!(report.fetched.len(), 1);
        assert_eq!(report.failed, 0);
    }

    #[test]
    fn exhausting_retries_counts_as_failed_not_fatal() {
        struct AlwaysFails;
        impl Fetcher for AlwaysFails {
            fn fetch(&self, _url: &str) -> FetchOutcome {
                FetchOutcome::Failed("permanent".into())
            }
        }
        let report = run_crawl(
            vec!["https://example.com/a".to_string()],
            Arc::new(AlwaysFails),
            &CrawlConfig {
                retry_max_attempts: 2,
                ..CrawlConfig::default()
            },
            Arc::new(AtomicBool::new(false)),
        );
        assert_eq!(report.fetched.len(), 0);
        assert_eq!(report.failed, 1);
    }

    #[test]
    fn throttling_counts_events_and_eventually_gives_up() {
        let report = run_crawl(
            vec!["https://example.com/a".to_string()],
            Arc::new(AlwaysThrottled),
            &CrawlConfig {
                retry_max_attempts: 3,
                ..CrawlConfig::default()
            },
            Arc::new(AtomicBool::new(false)),
        );
        assert_eq!(report.throttle_events, 3);
        assert_eq!(report.failed, 1);
        assert!(report.final_concurrency_limit < CrawlConfig::default().min_concurrency.max(1) + 1);
    }

    #[test]
    fn cancellation_stops_new_fetches() {
        let cancel = Arc::new(AtomicBool::new(true));
        let urls: Vec<String> = (0..5).map(|i| format!("https://example.com/{i}")).collect();
        let report = run_crawl(urls, Arc::new(AlwaysSucceeds), &CrawlConfig::default(), cancel);
        assert_eq!(report.fetched.len(), 0);
    }
}
