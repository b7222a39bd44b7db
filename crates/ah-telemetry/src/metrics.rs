//! Prometheus metrics.
//!
//! All metrics follow the naming convention: `ah_<component>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry,
    TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // QUERY METRICS
    // =========================================================================

    /// Replies sent by the query dispatcher
    pub static ref QUERY_REPLIES: IntCounterVec = IntCounterVec::new(
        Opts::new("ah_query_replies_total", "Replies sent per query subject"),
        &["subject", "code"]
    ).expect("metric creation failed");

    // =========================================================================
    // TOPIC MONITOR METRICS
    // =========================================================================

    /// Sync pass duration
    pub static ref SYNC_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "ah_topic_monitor_sync_duration_seconds",
            "Time spent in one topic monitor sync pass"
        ).buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0, 30.0, 60.0])
    ).expect("metric creation failed");

    /// Orphaned topics seen by the last pass
    pub static ref ORPHANED_TOPICS: IntGauge = IntGauge::new(
        "ah_topic_monitor_orphaned_topics",
        "Topics without a subscription at the last sync pass"
    ).expect("metric creation failed");

    /// Prune attempts
    pub static ref TOPICS_PRUNED: IntCounterVec = IntCounterVec::new(
        Opts::new("ah_topic_monitor_prune_total", "Topic prune attempts"),
        &["outcome"]  // outcome: pruned/failed
    ).expect("metric creation failed");

    // =========================================================================
    // GATEWAY METRICS
    // =========================================================================

    /// Remote gateway invocations
    pub static ref GATEWAY_CALLS: IntCounterVec = IntCounterVec::new(
        Opts::new("ah_gateway_calls_total", "Remote gateway invocations"),
        &["outcome"]  // outcome: ok/failed/dropped/rejected
    ).expect("metric creation failed");

    // =========================================================================
    // REPORTED METRICS
    // =========================================================================

    /// Values pushed through the metrics reporter
    pub static ref REPORTED: IntGaugeVec = IntGaugeVec::new(
        Opts::new("ah_reported", "Last value pushed through the metrics reporter"),
        &["name"]
    ).expect("metric creation failed");
}

/// Handle proving metrics are registered.
#[derive(Debug, Clone, Copy)]
pub struct MetricsHandle {
    _registered: (),
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once: already-registered metrics are skipped.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(QUERY_REPLIES.clone()),
        Box::new(SYNC_DURATION.clone()),
        Box::new(ORPHANED_TOPICS.clone()),
        Box::new(TOPICS_PRUNED.clone()),
        Box::new(GATEWAY_CALLS.clone()),
        Box::new(REPORTED.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle { _registered: () })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_metrics_twice() {
        register_metrics().unwrap();
        register_metrics().unwrap();
    }

    #[test]
    fn test_counter_increment() {
        QUERY_REPLIES.with_label_values(&["status", "Ok"]).inc();
        assert!(QUERY_REPLIES.with_label_values(&["status", "Ok"]).get() >= 1);
    }

    #[test]
    fn test_encode_contains_registered_metric() {
        register_metrics().unwrap();
        GATEWAY_CALLS.with_label_values(&["ok"]).inc();
        let text = encode_metrics().unwrap();
        assert!(text.contains("ah_gateway_calls_total"));
    }
}
