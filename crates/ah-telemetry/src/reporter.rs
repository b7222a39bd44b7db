//! Metrics Reporter port.
//!
//! Components push a mapping of metric name to integer value. Reporting is
//! fire-and-forget: it never fails the caller.

use crate::metrics::REPORTED;
use parking_lot::Mutex;
use std::collections::HashMap;

/// Metric name to value.
pub type Metrics = HashMap<String, i64>;

/// Accepts metric snapshots.
pub trait Reporter: Send + Sync {
    fn report(&self, metrics: Metrics);
}

/// Publishes reported values as Prometheus gauges labelled by name.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrometheusReporter;

impl Reporter for PrometheusReporter {
    fn report(&self, metrics: Metrics) {
        for (name, value) in &metrics {
            REPORTED.with_label_values(&[name.as_str()]).set(*value);
        }
        tracing::debug!(count = metrics.len(), "Reported metrics");
    }
}

/// Keeps every report in memory.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    reports: Mutex<Vec<Metrics>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All reports, oldest first.
    pub fn reports(&self) -> Vec<Metrics> {
        self.reports.lock().clone()
    }

    pub fn last(&self) -> Option<Metrics> {
        self.reports.lock().last().cloned()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, metrics: Metrics) {
        self.reports.lock().push(metrics);
    }
}
