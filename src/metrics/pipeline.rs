//! Pipeline Phase Metrics
//!
//! Sentinel results per classified column, rows dropped per stage and rows
//! added by color explosion.

use crate::metrics::{metric_name, MetricDoc, MetricType, PhaseMetrics};

pub struct PipelineMetrics;

impl PipelineMetrics {
    /// Record `count` cells of `field` that no rule matched
    pub fn record_unmatched(field: &str, count: usize) {
        if count == 0 {
            return;
        }
        ::metrics::counter!(metric_name!(counter, "unmatched"), "field" => field.to_string())
            .increment(count as u64);
    }

    pub fn record_rows_dropped(stage: &str, count: usize) {
        if count == 0 {
            return;
        }
        ::metrics::counter!(metric_name!(counter, "rows_dropped"), "stage" => stage.to_string())
            .increment(count as u64);
    }

    pub fn record_rows_exploded(count: usize) {
        ::metrics::counter!(metric_name!(counter, "rows_exploded")).increment(count as u64);
    }

    /// Rows written by the last run
    pub fn record_output_rows(count: usize) {
        ::metrics::gauge!(metric_name!(gauge, "output_rows")).set(count as f64);
    }
}

impl PhaseMetrics for PipelineMetrics {
    fn register_metrics() {
        use metrics::{counter, gauge};

        // Labelled series appear with their first increment
        for doc in unlabelled(Self::metrics_documentation()) {
            match doc.metric_type {
                MetricType::Counter => {
                    let _ = counter!(doc.name);
                }
                MetricType::Gauge => {
                    let _ = gauge!(doc.name);
                }
            }
        }
    }

    fn phase_name() -> &'static str {
        "pipeline"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: metric_name!(counter, "unmatched"),
                metric_type: MetricType::Counter,
                help: "Classified cells that no rule matched",
                labels: vec!["field"],
            },
            MetricDoc {
                name: metric_name!(counter, "rows_dropped"),
                metric_type: MetricType::Counter,
                help: "Rows removed by a pipeline stage",
                labels: vec!["stage"],
            },
            MetricDoc {
                name: metric_name!(counter, "rows_exploded"),
                metric_type: MetricType::Counter,
                help: "Rows added by splitting multi-color listings",
                labels: vec![],
            },
            MetricDoc {
                name: metric_name!(gauge, "output_rows"),
                metric_type: MetricType::Gauge,
                help: "Rows written by the last run",
                labels: vec![],
            },
        ]
    }
}

fn unlabelled(docs: Vec<MetricDoc>) -> impl Iterator<Item = MetricDoc> {
    docs.into_iter().filter(|doc| doc.labels.is_empty())
}
