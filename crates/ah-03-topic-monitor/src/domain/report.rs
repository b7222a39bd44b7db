//! Outcome of one sync pass.

use serde::Serialize;
use shared_bus::PruneResults;
use std::time::Duration;

/// Metric name for the pass duration in seconds.
pub const SYNC_DURATION_METRIC: &str = "pubsub_topics_monitor_sync_duration";

/// Metric name for the number of expired topics processed.
pub const TOPIC_COUNT_METRIC: &str = "pubsub_topics_monitor_topic_count";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Wall-clock snapshot shared by every record written in the pass.
    pub now: u64,
    /// Topics seen by the scan.
    pub observed: usize,
    /// Topics without a subscription.
    pub orphaned: Vec<String>,
    /// Recorded topics past the retention window.
    pub expired: Vec<String>,
    pub prune_results: PruneResults,
    pub duration: Duration,
}

impl SyncReport {
    #[must_use]
    pub fn pruned(&self) -> usize {
        self.prune_results.succeeded()
    }
}
