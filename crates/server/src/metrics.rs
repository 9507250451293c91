//! Prometheus recorder installation (spec.md §6 names metrics exporters as
//! an ambient concern). `/metrics` serves whatever this recorder has
//! accumulated, rendered as Prometheus text exposition.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Installs the process-global recorder and returns the handle used to
/// render scrapes. Must be called exactly once per process.
pub fn install_recorder() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install prometheus recorder")
}
