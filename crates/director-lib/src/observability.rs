//! Observability infrastructure for the pod director
//!
//! Prometheus metrics covering the cluster-facing call path; structured
//! logging is done inline with `tracing` fields at the call sites.

use prometheus::{register_histogram_vec, register_int_gauge, HistogramVec, IntGauge};
use std::sync::OnceLock;

/// Default histogram buckets for remote call latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<DirectorMetricsInner> = OnceLock::new();

struct DirectorMetricsInner {
    cluster_call_latency_seconds: HistogramVec,
    cluster_call_errors: IntGauge,
    deployments_created: IntGauge,
    deployments_updated: IntGauge,
    deployments_deleted: IntGauge,
}

impl DirectorMetricsInner {
    fn new() -> Self {
        Self {
            cluster_call_latency_seconds: register_histogram_vec!(
                "pod_director_cluster_call_latency_seconds",
                "Time spent in remote calls against the cluster API",
                &["operation"],
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register cluster_call_latency_seconds"),

            cluster_call_errors: register_int_gauge!(
                "pod_director_cluster_call_errors_total",
                "Total number of failed cluster API calls"
            )
            .expect("Failed to register cluster_call_errors_total"),

            deployments_created: register_int_gauge!(
                "pod_director_deployments_created_total",
                "Total number of deployments created in the cluster"
            )
            .expect("Failed to register deployments_created_total"),

            deployments_updated: register_int_gauge!(
                "pod_director_deployments_updated_total",
                "Total number of deployments replaced in the cluster"
            )
            .expect("Failed to register deployments_updated_total"),

            deployments_deleted: register_int_gauge!(
                "pod_director_deployments_deleted_total",
                "Total number of deployments deleted from the cluster"
            )
            .expect("Failed to register deployments_deleted_total"),
        }
    }
}

/// Director metrics for Prometheus exposition
///
/// This is a lightweight handle to the global metrics instance.
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct DirectorMetrics {
    _private: (),
}

impl Default for DirectorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectorMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(DirectorMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &DirectorMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    /// Record the latency of one cluster API call
    pub fn observe_cluster_call(&self, operation: &str, duration_secs: f64) {
        self.inner()
            .cluster_call_latency_seconds
            .with_label_values(&[operation])
            .observe(duration_secs);
    }

    /// Increment the failed cluster call counter
    pub fn inc_cluster_call_errors(&self) {
        self.inner().cluster_call_errors.inc();
    }

    /// Increment the created deployments counter
    pub fn inc_deployments_created(&self) {
        self.inner().deployments_created.inc();
    }

    /// Increment the replaced deployments counter
    pub fn inc_deployments_updated(&self) {
        self.inner().deployments_updated.inc();
    }

    /// Increment the deleted deployments counter
    pub fn inc_deployments_deleted(&self) {
        self.inner().deployments_deleted.inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_handle_records_observations() {
        let metrics = DirectorMetrics::new();

        metrics.observe_cluster_call("get", 0.002);
        metrics.observe_cluster_call("create", 0.015);
        metrics.inc_cluster_call_errors();
        metrics.inc_deployments_created();
        metrics.inc_deployments_updated();
        metrics.inc_deployments_deleted();
    }
}
