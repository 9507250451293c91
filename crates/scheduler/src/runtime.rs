//! The sync scheduler protocol (spec.md §4.8): `initialize/trigger/stats/
//! stop`, generic over whatever [`SyncExecutor`] a tenant's source kind
//! needs. `trigger` is non-blocking: it acquires the lease synchronously
//! (so contention is reported immediately) and hands the actual sync work
//! to a background thread.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use chrono::Utc;
use docsearch_schema::Schema;
use docsearch_tenant::{SyncDelegate, SyncState, SyncTriggerResult, SyncTriggerStatus};
use tracing::{info, warn};

use crate::cadence::Cadence;
use crate::error::SchedulerError;
use crate::executor::SyncExecutor;
use crate::sync_state::{empty_sync_state, read_sync_state, write_sync_state};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerStatus {
    Accepted,
    AlreadyRunning,
    Skipped,
}

#[derive(Debug, Clone)]
pub struct TriggerOutcome {
    pub status: TriggerStatus,
    pub lock_status: String,
    pub stats: SyncState,
}

struct ActiveSync {
    cancel: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

pub struct SchedulerRuntime<E: SyncExecutor + 'static> {
    docs_root: PathBuf,
    schema: Schema,
    cadence: Option<Cadence>,
    executor: Arc<E>,
    owner_id: String,
    lease_ttl: Duration,
    active: Mutex<Option<ActiveSync>>,
}

impl<E: SyncExecutor + 'static> SchedulerRuntime<E> {
    pub fn new(docs_root: PathBuf, schema: Schema, executor: E, owner_id: impl Into<String>) -> Self {
        Self {
            docs_root,
            schema,
            cadence: None,
            executor: Arc::new(executor),
            owner_id: owner_id.into(),
            lease_ttl: Duration::from_secs(docsearch_crawler::DEFAULT_TTL_SECONDS),
            active: Mutex::new(None),
        }
    }

    pub fn with_cadence(mut self, cadence: Cadence) -> Self {
        self.cadence = Some(cadence);
        self
    }

    pub fn with_lease_ttl(mut self, ttl: Duration) -> Self {
        self.lease_ttl = ttl.max(Duration::from_secs(docsearch_crawler::MIN_TTL_SECONDS));
        self
    }

    /// Idempotent bootstrap; may perform an initial sync (spec.md §4.8).
    pub fn initialize(&self) -> Result<(), SchedulerError> {
        self.trigger(false, false);
        Ok(())
    }

    pub fn trigger(&self, force_crawler: bool, force_full: bool) -> TriggerOutcome {
        let _ = force_crawler;
        let previous_stats = read_sync_state(&self.docs_root)
            .ok()
            .flatten()
            .unwrap_or_else(empty_sync_state);

        if !force_full {
            if let Some(cadence) = &self.cadence {
                let last = previous_stats
                    .last_sync_at
                    .as_deref()
                    .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
                    .map(|dt| dt.with_timezone(&Utc));
                if !cadence.is_due(last, Utc::now()) {
                    return TriggerOutcome {
                        status: TriggerStatus::Skipped,
                        lock_status: "free".to_string(),
                        stats: previous_stats,
                    };
                }
            }
        }

        let mut active = self.active.lock().unwrap();
        if let Some(current) = active.as_ref() {
            if !current.handle.is_finished() {
                return TriggerOutcome {
                    status: TriggerStatus::AlreadyRunning,
                    lock_status: "contended".to_string(),
                    stats: previous_stats,
                };
            }
        }

        let lease = match docsearch_crawler::Lease::acquire(&self.docs_root, &self.owner_id, self.lease_ttl) {
            Ok(lease) => lease,
            Err(_) => {
                return TriggerOutcome {
                    status: TriggerStatus::AlreadyRunning,
                    lock_status: "contended".to_string(),
                    stats: previous_stats,
                }
            }
        };

        let cancel = Arc::new(AtomicBool::new(false));
        let handle = spawn_sync_worker(
            self.docs_root.clone(),
            self.schema.clone(),
            Arc::clone(&self.executor),
            lease,
            force_full,
            Arc::clone(&cancel),
            previous_stats.consecutive_failures,
        );
        *active = Some(ActiveSync { cancel, handle });

        TriggerOutcome {
            status: TriggerStatus::Accepted,
            lock_status: "held".to_string(),
            stats: previous_stats,
        }
    }

    pub fn stats(&self) -> SyncState {
        read_sync_state(&self.docs_root)
            .ok()
            .flatten()
            .unwrap_or_else(empty_sync_state)
    }

    /// Cooperative cancellation with a bounded deadline (spec.md §5); past
    /// the deadline the worker is abandoned and its lease is left to expire.
    pub fn stop(&self, timeout: Duration) {
        let mut active = self.active.lock().unwrap();
        let Some(current) = active.take() else {
            return;
        };
        current.cancel.store(true, Ordering::SeqCst);

        let deadline = std::time::Instant::now() + timeout;
        while !current.handle.is_finished() && std::time::Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
        if current.handle.is_finished() {
            let _ = current.handle.join();
        } else {
            warn!(docs_root = %self.docs_root.display(), "scheduler_stop_timed_out_abandoning_worker");
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn spawn_sync_worker<E: SyncExecutor + 'static>(
    docs_root: PathBuf,
    schema: Schema,
    executor: Arc<E>,
    lease: docsearch_crawler::Lease,
    force_full: bool,
    cancel: Arc<AtomicBool>,
    consecutive_failures: u32,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let started_at = Utc::now();
        let result = executor.execute(&docs_root, force_full, &cancel).and_then(|doc_count| {
            docsearch_indexer::build_segment(&docs_root, &schema)?;
            Ok(doc_count)
        });

        let mut state = read_sync_state(&docs_root).ok().flatten().unwrap_or_else(empty_sync_state);
        state.last_sync_at = Some(started_at.to_rfc3339());
        match result {
            Ok(doc_count) => {
                state.documents_count = doc_count;
                state.last_success_at = Some(Utc::now().to_rfc3339());
                state.last_error = None;
                state.consecutive_failures = 0;
                info!(docs_root = %docs_root.display(), doc_count, "scheduler_sync_success");
            }
            Err(e) => {
                state.last_error = Some(e.to_string());
                state.consecutive_failures = consecutive_failures + 1;
                warn!(docs_root = %docs_root.display(), error = %e, "scheduler_sync_failed");
            }
        }
        state.lock_status = "free".to_string();
        if let Err(e) = write_sync_state(&docs_root, &state) {
            warn!(docs_root = %docs_root.display(), error = %e, "scheduler_sync_state_write_failed");
        }
        lease.release();
    })
}

fn map_status(status: TriggerStatus) -> SyncTriggerStatus {
    match status {
        TriggerStatus::Accepted => SyncTriggerStatus::Started,
        TriggerStatus::AlreadyRunning => SyncTriggerStatus::AlreadyRunning,
        TriggerStatus::Skipped => SyncTriggerStatus::Skipped,
    }
}

/// Satisfies `docsearch-tenant`'s consumer-side [`SyncDelegate`] trait so a
/// `TenantRuntime` can trigger a sync without depending on this crate.
impl<E: SyncExecutor + 'static> SyncDelegate for SchedulerRuntime<E> {
    fn trigger(&self, force_full: bool) -> SyncTriggerResult {
        let outcome = SchedulerRuntime::trigger(self, false, force_full);
        SyncTriggerResult {
            status: map_status(outcome.status),
            lock_status: outcome.lock_status,
        }
    }

    fn stats(&self) -> SyncState {
        SchedulerRuntime::stats(self)
    }
}
