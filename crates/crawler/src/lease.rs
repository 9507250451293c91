//! The cross-process lease lock (spec.md §4.9): a file created with
//! create-if-not-exists semantics (`O_CREAT|O_EXCL` via
//! `OpenOptions::create_new`) under `<tenant>/__scheduler_meta/locks/crawler.lock`.
//! Only one process may hold it per tenant at a time; a crashed holder's
//! lease is reclaimed once its TTL elapses.

use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::CrawlerError;

pub const DEFAULT_TTL_SECONDS: u64 = 180;
pub const MIN_TTL_SECONDS: u64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LeaseInfo {
    owner_id: String,
    acquired_at: DateTime<Utc>,
    ttl_seconds: u64,
}

impl LeaseInfo {
    fn is_expired(&self) -> bool {
        let deadline = self.acquired_at + chrono::Duration::seconds(self.ttl_seconds as i64);
        Utc::now() > deadline
    }
}

pub fn lease_path(tenant_root: &Path) -> PathBuf {
    tenant_root
        .join("__scheduler_meta")
        .join("locks")
        .join("crawler.lock")
}

fn fsync_dir(dir: &Path) {
    if let Ok(f) = std::fs::File::open(dir) {
        let _ = f.sync_all();
    }
}

fn read_lease(path: &Path) -> Result<Option<LeaseInfo>, CrawlerError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| CrawlerError::LeaseCorrupt {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(CrawlerError::io(path, e)),
    }
}

fn write_lease(path: &Path, info: &LeaseInfo, create_new: bool) -> Result<(), CrawlerError> {
    let body = serde_json::to_string(info).expect("LeaseInfo always serializes");
    let mut opts = OpenOptions::new();
    opts.write(true);
    if create_new {
        opts.create_new(true);
    } else {
        opts.create(true).truncate(true);
    }
    let mut file = opts
        .open(path)
        .map_err(|e| CrawlerError::io(path, e))?;
    file.write_all(body.as_bytes())
        .map_err(|e| CrawlerError::io(path, e))?;
    file.sync_all().map_err(|e| CrawlerError::io(path, e))?;
    if let Some(parent) = path.parent() {
        fsync_dir(parent);
    }
    Ok(())
}

/// Whether the lease is currently held by a live (non-expired) owner, for
/// `trigger()`'s non-blocking `already_running`/`contended` report.
pub fn is_held(tenant_root: &Path) -> Result<bool, CrawlerError> {
    let path = lease_path(tenant_root);
    match read_lease(&path)? {
        Some(info) => Ok(!info.is_expired()),
        None => Ok(false),
    }
}

/// A held lease. Dropping without calling [`Lease::release`] leaves the
/// file in place; it still expires naturally after its TTL, matching the
/// "hard abort releases the lease by letting it expire" shutdown path.
pub struct Lease {
    path: PathBuf,
    owner_id: String,
    ttl: Duration,
}

impl Lease {
    /// Attempts to acquire the lease for `owner_id`. If an existing lease
    /// is expired it is reclaimed (removed and recreated); if it is live,
    /// returns `<LeaseHeld>` with the current owner.
    pub fn acquire(tenant_root: &Path, owner_id: &str, ttl: Duration) -> Result<Self, CrawlerError> {
        let path = lease_path(tenant_root);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CrawlerError::io(parent, e))?;
        }

        let info = LeaseInfo {
            owner_id: owner_id.to_string(),
            acquired_at: Utc::now(),
            ttl_seconds: ttl.as_secs(),
        };

        match write_lease(&path, &info, true) {
            Ok(()) => Ok(Self {
                path,
                owner_id: owner_id.to_string(),
                ttl,
            }),
            Err(CrawlerError::Io { source, .. }) if source.kind() == std::io::ErrorKind::AlreadyExists => {
                match read_lease(&path)? {
                    Some(existing) if !existing.is_expired() => Err(CrawlerError::LeaseHeld {
                        path,
                        owner_id: existing.owner_id,
                    }),
                    _ => {
                        // Expired (or unreadable-as-absent) lease: reclaim it.
                        write_lease(&path, &info, false)?;
                        Ok(Self {
                            path,
                            owner_id: owner_id.to_string(),
                            ttl,
                        })
                    }
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Rewrites the lease with a fresh `acquired_at`. Callers are expected
    /// to refresh at `ttl / 3` while the crawl is in progress.
    pub fn refresh(&self) -> Result<(), CrawlerError> {
        let info = LeaseInfo {
            owner_id: self.owner_id.clone(),
            acquired_at: Utc::now(),
            ttl_seconds: self.ttl.as_secs(),
        };
        write_lease(&self.path, &info, false)
    }

    pub fn refresh_interval(&self) -> Duration {
        self.ttl / 3
    }

    /// Releases the lease by deleting the file. Best-effort: a failure here
    /// just means the lease expires naturally instead.
    pub fn release(self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "lease_release_failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_then_contend_reports_held() {
        let dir = tempfile::tempdir().unwrap();
        let lease = Lease::acquire(dir.path(), "proc-a", Duration::from_secs(180)).unwrap();
        assert!(is_held(dir.path()).unwrap());

        let err = Lease::acquire(dir.path(), "proc-b", Duration::from_secs(180)).unwrap_err();
        assert!(matches!(err, CrawlerError::LeaseHeld { .. }));

        lease.release();
        assert!(!is_held(dir.path()).unwrap());
    }

    #[test]
    fn expired_lease_is_reclaimed_by_another_owner() {
        let dir = tempfile::tempdir().unwrap();
        let _lease = Lease::acquire(dir.path(), "proc-a", Duration::from_millis(1)).unwrap();
        std::thread::sleep(Duration::from_millis(20));
        assert!(!is_held(dir.path()).unwrap());

        let second = Lease::acquire(dir.path(), "proc-b", Duration::from_secs(180));
        assert!(second.is_ok());
    }

    #[test]
    fn refresh_extends_acquired_at() {
        let dir = tempfile::tempdir().unwrap();
        let lease = Lease::acquire(dir.path(), "proc-a", Duration::from_secs(180)).unwrap();
        lease.refresh().unwrap();
        assert!(is_held(dir.path()).unwrap());
    }
}
