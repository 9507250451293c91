//! Tenant registry and root-level tool routing (spec.md §4.6): `list_tenants`,
//! `find_tenant`, `describe_tenant`, `root_search`, `root_fetch`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use docsearch_schema::Schema;
use docsearch_tenant::{
    DescribeResponse, FetchMode, FetchResponse, SearchResponse, SyncTriggerResult, TenantHealth,
    TenantRuntime,
};
use tracing::warn;

use crate::error::DispatcherError;
use crate::fuzzy::best_matches;
use crate::types::TenantSummary;

const MAX_FIND_QUERY_CHARS: usize = 256;

pub struct Dispatcher {
    tenants: HashMap<String, Arc<TenantRuntime>>,
    order: Vec<String>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            tenants: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn register(&mut self, runtime: Arc<TenantRuntime>) {
        let codename = runtime.codename().to_string();
        if !self.tenants.contains_key(&codename) {
            self.order.push(codename.clone());
        }
        self.tenants.insert(codename, runtime);
    }

    fn available_codenames(&self) -> Vec<String> {
        self.order.clone()
    }

    fn get(&self, codename: &str) -> Result<&Arc<TenantRuntime>, DispatcherError> {
        self.tenants
            .get(codename)
            .ok_or_else(|| DispatcherError::TenantNotFound {
                requested: codename.to_string(),
                available: self.available_codenames(),
            })
    }

    pub fn list_tenants(&self) -> Vec<TenantSummary> {
        self.order
            .iter()
            .map(|codename| {
                let d = self.tenants[codename].describe();
                TenantSummary {
                    codename: d.codename,
                    display_name: d.display_name,
                    description: d.description,
                }
            })
            .collect()
    }

    pub fn find_tenant(&self, query: &str) -> Result<Vec<TenantSummary>, DispatcherError> {
        if query.is_empty() {
            return Err(DispatcherError::InvalidArgument(
                "query must not be empty".into(),
            ));
        }
        if query.chars().count() > MAX_FIND_QUERY_CHARS {
            return Err(DispatcherError::InvalidArgument(format!(
                "query exceeds {MAX_FIND_QUERY_CHARS} characters"
            )));
        }

        let candidates: Vec<(String, String, String)> = self
            .order
            .iter()
            .map(|codename| {
                let d = self.tenants[codename].describe();
                (d.codename, d.display_name, d.description)
            })
            .collect();

        let haystacks: Vec<(String, String)> = candidates
            .iter()
            .map(|(codename, display_name, _)| (codename.clone(), display_name.clone()))
            .collect();
        let ranked = best_matches(query, &haystacks);

        Ok(ranked
            .into_iter()
            .filter_map(|codename| {
                candidates
                    .iter()
                    .find(|(c, _, _)| c == &codename)
                    .map(|(codename, display_name, description)| TenantSummary {
                        codename: codename.clone(),
                        display_name: display_name.clone(),
                        description: description.clone(),
                    })
            })
            .collect())
    }

    pub fn describe_tenant(&self, codename: &str) -> Result<DescribeResponse, DispatcherError> {
        Ok(self.get(codename)?.describe())
    }

    pub fn root_search(
        &self,
        codename: &str,
        query: &str,
        size: usize,
        word_match: bool,
    ) -> Result<SearchResponse, DispatcherError> {
        Ok(self.get(codename)?.search(query, size, word_match)?)
    }

    pub fn root_fetch(
        &self,
        codename: &str,
        uri: &str,
        mode: FetchMode,
        query_hint: Option<&str>,
    ) -> Result<FetchResponse, DispatcherError> {
        Ok(self.get(codename)?.fetch(uri, mode, query_hint)?)
    }

    /// Residency and last-sync state for every registered tenant, in
    /// registration order (spec.md §4.5 "publishes residency and last-sync
    /// state to the dispatcher's health endpoint").
    pub fn tenant_health(&self) -> Vec<TenantHealth> {
        self.order.iter().map(|codename| self.tenants[codename].health()).collect()
    }

    /// Forwards a sync trigger to the named tenant's scheduler delegate.
    /// `None` when the tenant has no delegate configured (a filesystem
    /// tenant with nothing to sync, in practice).
    pub fn trigger_sync(
        &self,
        codename: &str,
        force_full: bool,
    ) -> Result<Option<SyncTriggerResult>, DispatcherError> {
        Ok(self.get(codename)?.trigger_sync(force_full))
    }

    /// Runs the index-audit for every registered tenant and refreshes its
    /// segment residency on success. Failures are logged, never propagated:
    /// a boot-time audit must never block HTTP readiness (spec.md §4.7).
    pub fn boot_time_audit(&self, schema: &Schema, timeout: Duration) {
        for codename in &self.order {
            let runtime = &self.tenants[codename];
            match docsearch_indexer::audit_with_timeout(runtime.docs_root_dir(), schema, false, timeout)
            {
                Ok(Some(report)) => {
                    if let Err(e) = runtime.refresh() {
                        warn!(tenant = %codename, error = %e, "boot_audit_refresh_failed");
                    } else {
                        tracing::info!(tenant = %codename, outcome = ?report.outcome, "boot_audit_complete");
                    }
                }
                Ok(None) => warn!(tenant = %codename, "boot_audit_timed_out"),
                Err(e) => warn!(tenant = %codename, error = %e, "boot_audit_failed"),
            }
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
