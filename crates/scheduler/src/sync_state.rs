//! Persists `__scheduler_meta/sync.json` (SPEC_FULL.md §A2) so `stats()`
//! survives process restarts, the same atomic-rename idiom the indexer
//! uses for its manifest pointer.

use std::path::{Path, PathBuf};

use docsearch_tenant::SyncState;

use crate::error::SchedulerError;

pub fn scheduler_meta_dir(tenant_root: &Path) -> PathBuf {
    tenant_root.join("__scheduler_meta")
}

pub fn sync_state_path(tenant_root: &Path) -> PathBuf {
    scheduler_meta_dir(tenant_root).join("sync.json")
}

pub fn read_sync_state(tenant_root: &Path) -> Result<Option<SyncState>, SchedulerError> {
    let path = sync_state_path(tenant_root);
    match std::fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| SchedulerError::StateCorrupt {
                path,
                reason: e.to_string(),
            }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(SchedulerError::io(path, e)),
    }
}

pub fn write_sync_state(tenant_root: &Path, state: &SyncState) -> Result<(), SchedulerError> {
    let dir = scheduler_meta_dir(tenant_root);
    std::fs::create_dir_all(&dir).map_err(|e| SchedulerError::io(&dir, e))?;
    let final_path = sync_state_path(tenant_root);
    let tmp_path = dir.join(format!("sync-{}.tmp", std::process::id()));

    let body = serde_json::to_string_pretty(state).expect("SyncState always serializes");
    std::fs::write(&tmp_path, body).map_err(|e| SchedulerError::io(&tmp_path, e))?;
    let file = std::fs::File::open(&tmp_path).map_err(|e| SchedulerError::io(&tmp_path, e))?;
    file.sync_all().map_err(|e| SchedulerError::io(&tmp_path, e))?;
    std::fs::rename(&tmp_path, &final_path).map_err(|e| SchedulerError::io(&final_path, e))?;
    Ok(())
}

pub fn empty_sync_state() -> SyncState {
    SyncState {
        last_sync_at: None,
        last_success_at: None,
        last_error: None,
        documents_count: 0,
        consecutive_failures: 0,
        lock_status: "free".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_sync_state() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_sync_state(dir.path()).unwrap().is_none());

        let mut state = empty_sync_state();
        state.documents_count = 3;
        state.lock_status = "held".into();
        write_sync_state(dir.path(), &state).unwrap();

        let read_back = read_sync_state(dir.path()).unwrap().unwrap();
        assert_eq!(read_back, state);
    }
}
