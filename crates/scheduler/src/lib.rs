//! Sync scheduler protocol (C8): `initialize/trigger/stats/stop`, the same
//! shape whether the tenant behind it is crawler-backed or git-backed
//! (spec.md §4.8 — "the protocol is the only interface the dispatcher
//! uses; it must not branch on source kind in routing code").

mod cadence;
mod error;
mod executor;
mod runtime;
mod sync_state;

pub use cadence::Cadence;
pub use error::SchedulerError;
pub use executor::{CrawlerSyncExecutor, FilesystemSyncExecutor, SyncExecutor};
pub use runtime::{SchedulerRuntime, TriggerOutcome, TriggerStatus};
pub use sync_state::{read_sync_state, sync_state_path, write_sync_state};

#[cfg(test)]
mod tests {
    use super::*;
    use docsearch_schema::Schema;
    use docsearch_tenant::SyncDelegate;

    #[test]
    fn sync_delegate_adapter_maps_accepted_to_started() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.md"), "# A\n\nhello\n").unwrap();
        let runtime = SchedulerRuntime::new(
            dir.path().to_path_buf(),
            Schema::documentation_default(),
            FilesystemSyncExecutor,
            "delegate-test",
        );
        let result = SyncDelegate::trigger(&runtime, false);
        assert_eq!(result.status, docsearch_tenant::SyncTriggerStatus::Started);
    }
}
