//! # Topic Monitor Service
//!
//! One sync pass:
//!
//! 1. Scan every topic's subscription state (pages of `page_size`).
//! 2. Topics without a subscription are this pass's orphans.
//! 3. Before-refresh only: drop records for topics no longer orphaned.
//! 4. Fill: overwrite every orphan's record with one `now` snapshot.
//! 5. Expired: non-zero records older than the retention window. Before
//!    refresh, taken from this pass's orphans as recorded before step 4.
//!    After refresh, taken from every record as it stands after step 4.
//!    See [`AgeEvaluation`].
//! 6. Prune the expired topics, best-effort, logging each outcome.
//! 7. Remove the expired records.
//! 8. Report pass duration and expired count.
//!
//! A topic is never expired on the pass that first records it.

use crate::domain::config::{AgeEvaluation, MonitorConfig};
use crate::domain::errors::SyncError;
use crate::domain::report::{SyncReport, SYNC_DURATION_METRIC, TOPIC_COUNT_METRIC};
use crate::ports::outbound::{TimeSource, TopicRecordRegistry};
use ah_telemetry::{Metrics, Reporter, ORPHANED_TOPICS, SYNC_DURATION, TOPICS_PRUNED};
use shared_bus::{Bus, PruneResults};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

/// Orphaned topic garbage collector.
pub struct TopicMonitor {
    bus: Arc<dyn Bus>,
    registry: Arc<dyn TopicRecordRegistry>,
    clock: Arc<dyn TimeSource>,
    reporter: Arc<dyn Reporter>,
    config: MonitorConfig,
    /// Held for the whole pass; passes never overlap.
    pass: Mutex<()>,
}

impl TopicMonitor {
    pub fn new(
        bus: Arc<dyn Bus>,
        registry: Arc<dyn TopicRecordRegistry>,
        clock: Arc<dyn TimeSource>,
        reporter: Arc<dyn Reporter>,
        config: MonitorConfig,
    ) -> Self {
        Self {
            bus,
            registry,
            clock,
            reporter,
            config,
            pass: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Run one pass. Waits for any pass already in progress.
    #[instrument(skip(self), fields(age_evaluation = %self.config.age_evaluation))]
    pub async fn sync(&self) -> Result<SyncReport, SyncError> {
        let _pass = self.pass.lock().await;
        let started = Instant::now();
        let now = self.clock.now();

        let results = self
            .bus
            .check_all_subscriptions(self.config.page_size)
            .await?;
        let orphaned = results.without_subscriptions().topic_names();
        info!(
            total_results = results.len(),
            total_results_without_subscriptions = orphaned.len(),
            "Results found"
        );

        let prior = self.registry.records()?;
        if self.config.age_evaluation == AgeEvaluation::BeforeRefresh {
            let orphan_set: HashSet<&String> = orphaned.iter().collect();
            let recovered: Vec<String> = prior
                .names()
                .into_iter()
                .filter(|name| !orphan_set.contains(name))
                .collect();
            if !recovered.is_empty() {
                self.registry.clean(&recovered)?;
                info!(count = recovered.len(), "Dropped records for topics no longer orphaned");
            }
        }

        let current = self.registry.fill(&orphaned, now)?;

        // After refresh every orphan is aged zero, so only records this pass
        // did not see orphaned can expire.
        let basis = match self.config.age_evaluation {
            AgeEvaluation::BeforeRefresh => prior.only(&orphaned),
            AgeEvaluation::AfterRefresh => current,
        };
        let expired = basis.expired(now, self.config.retention_secs).names();

        let prune_results = if expired.is_empty() {
            PruneResults::default()
        } else {
            self.bus.prune_topics(&expired).await
        };
        for result in prune_results.iter() {
            match &result.error {
                None => {
                    TOPICS_PRUNED.with_label_values(&["pruned"]).inc();
                    info!(topic = %result.topic_name, "Pruned topic");
                }
                Some(err) => {
                    TOPICS_PRUNED.with_label_values(&["failed"]).inc();
                    warn!(topic = %result.topic_name, error = %err, "Failed to prune topic");
                }
            }
        }

        self.registry.clean(&expired)?;

        let duration = started.elapsed();
        ORPHANED_TOPICS.set(i64::try_from(orphaned.len()).unwrap_or(i64::MAX));
        SYNC_DURATION.observe(duration.as_secs_f64());
        self.reporter.report(Metrics::from([
            (
                SYNC_DURATION_METRIC.to_string(),
                i64::try_from(duration.as_secs()).unwrap_or(i64::MAX),
            ),
            (
                TOPIC_COUNT_METRIC.to_string(),
                i64::try_from(expired.len()).unwrap_or(i64::MAX),
            ),
        ]));

        info!(
            orphaned = orphaned.len(),
            expired = expired.len(),
            pruned = prune_results.succeeded(),
            failed = prune_results.failed(),
            "Sync pass complete"
        );

        Ok(SyncReport {
            now,
            observed: results.len(),
            orphaned,
            expired,
            prune_results,
            duration,
        })
    }
}
