use serde::{Deserialize, Serialize};

/// A tenant's public listing entry for `list_tenants`/`find_tenant`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TenantSummary {
    pub codename: String,
    pub display_name: String,
    pub description: String,
}

/// The lifecycle a single root-level tool call moves through (spec.md §4.6).
/// `docsearch-server` drives the transitions; a request cancelled before
/// `Responded` is dropped with no further side effects (the tenant runtime
/// call it was waiting on, if any, still completes, but its result is
/// discarded rather than sent).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Received,
    Resolved,
    Dispatched,
    Responded,
    Cancelled,
}

/// Tracks one request's progress through [`RequestState`] for logging and
/// cancellation bookkeeping. Transitions are one-directional except into
/// `Cancelled`, which can happen from any non-terminal state.
#[derive(Debug)]
pub struct RequestLifecycle {
    state: RequestState,
}

impl RequestLifecycle {
    pub fn new() -> Self {
        Self {
            state: RequestState::Received,
        }
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn resolve(&mut self) {
        debug_assert_eq!(self.state, RequestState::Received);
        self.state = RequestState::Resolved;
    }

    pub fn dispatch(&mut self) {
        debug_assert_eq!(self.state, RequestState::Resolved);
        self.state = RequestState::Dispatched;
    }

    pub fn respond(&mut self) {
        debug_assert_eq!(self.state, RequestState::Dispatched);
        self.state = RequestState::Responded;
    }

    pub fn cancel(&mut self) {
        if self.state != RequestState::Responded {
            self.state = RequestState::Cancelled;
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == RequestState::Cancelled
    }
}

impl Default for RequestLifecycle {
    fn default() -> Self {
        Self::new()
    }
}
