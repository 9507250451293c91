//! The document normalizer is an external collaborator (spec.md §6): the
//! crawler core never speaks HTTP or git itself, it drives whatever
//! implements this trait and reacts to the outcome.

/// One fetched document, already normalized to markdown by the collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedDocument {
    pub key: String,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Success(FetchedDocument),
    /// A `<Throttled>` signal (spec.md §7): consumed by the adaptive
    /// limiter, never surfaced to the user.
    Throttled,
    /// A `<FetchFailed>` signal: retried up to the configured attempt bound,
    /// then counted against the sync's failure stats.
    Failed(String),
}

/// Host is derived from the URL for per-host rate limiting; returning `None`
/// (e.g. a malformed URL) falls back to a single shared bucket keyed `""`.
pub fn host_of(url: &str) -> String {
    url.split("://")
        .nth(1)
        .and_then(|rest| rest.split('/').next())
        .unwrap_or("")
        .to_string()
}

pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> FetchOutcome;
}
