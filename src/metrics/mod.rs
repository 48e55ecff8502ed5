//! Metrics for the cleaning pipeline
//!
//! Counters are recorded through the `metrics` facade. Recording is a no-op
//! until [`init_metrics`] installs the Prometheus recorder, so library users
//! and tests pay nothing for them.

pub mod pipeline;

pub use pipeline::PipelineMetrics;

use std::sync::OnceLock;
use tracing::{info, warn};

static HANDLE: OnceLock<metrics_exporter_prometheus::PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder and register every pipeline metric.
///
/// Idempotent. No HTTP listener is started; the snapshot is taken in-process
/// with [`render`] at the end of a run.
pub fn init_metrics() {
    if HANDLE.get().is_some() {
        return;
    }

    match metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            if HANDLE.set(handle).is_err() {
                warn!("Prometheus handle was already stored");
            }
            PipelineMetrics::register_metrics();
            info!("Prometheus recorder installed");
        }
        Err(e) => {
            warn!("Failed to install Prometheus recorder: {}", e);
        }
    }
}

/// Prometheus text exposition of everything recorded so far, if a recorder is installed.
pub fn render() -> Option<String> {
    HANDLE.get().map(|handle| handle.render())
}

/// Trait for phase-specific metrics collections
pub trait PhaseMetrics {
    /// Pre-register the metrics so they show up before their first use
    fn register_metrics();

    fn phase_name() -> &'static str;

    fn metrics_documentation() -> Vec<MetricDoc>;
}

/// Documentation for a single metric
#[derive(Debug, Clone)]
pub struct MetricDoc {
    pub name: &'static str,
    pub metric_type: MetricType,
    pub help: &'static str,
    pub labels: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricType {
    Counter,
    Gauge,
}

/// Metric names follow `laptop_cleaner_{name}` with a `_total` suffix for counters
macro_rules! metric_name {
    (counter, $name:literal) => {
        concat!("laptop_cleaner_", $name, "_total")
    };
    (gauge, $name:literal) => {
        concat!("laptop_cleaner_", $name)
    };
}

pub(crate) use metric_name;
