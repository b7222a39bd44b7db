//! # Subscription Management
//!
//! Lifecycle configuration for one durable topic subscription, and the
//! result sets produced by the bus's subscription-management plane.

use crate::bus::BusCallback;
use crate::stop::StopSignal;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::oneshot;

/// Governs one long-lived topic subscription.
pub struct SubscribeConfig {
    /// Ends delivery when signalled.
    pub stop: StopSignal,
    /// Fired once the subscription is confirmed active.
    pub on_ready: Option<oneshot::Sender<()>>,
    /// Fired once the subscription has been torn down after `stop`.
    pub on_stopped: Option<oneshot::Sender<()>>,
    /// Invoked once per delivered message.
    pub callback: Arc<dyn BusCallback>,
}

/// Receiving ends of a subscription's lifecycle signals.
pub struct SubscriptionSignals {
    pub on_ready: oneshot::Receiver<()>,
    pub on_stopped: oneshot::Receiver<()>,
}

impl SubscribeConfig {
    /// Config without lifecycle signals.
    pub fn new(stop: StopSignal, callback: Arc<dyn BusCallback>) -> Self {
        Self {
            stop,
            on_ready: None,
            on_stopped: None,
            callback,
        }
    }

    /// Config wired to a fresh pair of lifecycle signals.
    pub fn with_signals(
        stop: StopSignal,
        callback: Arc<dyn BusCallback>,
    ) -> (Self, SubscriptionSignals) {
        let (ready_tx, ready_rx) = oneshot::channel();
        let (stopped_tx, stopped_rx) = oneshot::channel();
        let config = Self {
            stop,
            on_ready: Some(ready_tx),
            on_stopped: Some(stopped_tx),
            callback,
        };
        let signals = SubscriptionSignals {
            on_ready: ready_rx,
            on_stopped: stopped_rx,
        };
        (config, signals)
    }
}

/// Subscription state of one topic at scan time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionCheckResult {
    pub topic_name: String,
    /// Identities of the active subscriptions.
    pub subscription_names: Vec<String>,
}

impl SubscriptionCheckResult {
    #[must_use]
    pub fn has_subscriptions(&self) -> bool {
        !self.subscription_names.is_empty()
    }
}

/// Complete result of a subscription scan.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct SubscriptionCheckResults(pub Vec<SubscriptionCheckResult>);

impl SubscriptionCheckResults {
    /// Topics with at least one active subscription.
    #[must_use]
    pub fn with_subscriptions(&self) -> SubscriptionCheckResults {
        self.partition(true)
    }

    /// Topics with no subscription: the orphan candidates.
    #[must_use]
    pub fn without_subscriptions(&self) -> SubscriptionCheckResults {
        self.partition(false)
    }

    #[must_use]
    pub fn topic_names(&self) -> Vec<String> {
        self.0.iter().map(|r| r.topic_name.clone()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn partition(&self, subscribed: bool) -> SubscriptionCheckResults {
        SubscriptionCheckResults(
            self.0
                .iter()
                .filter(|r| r.has_subscriptions() == subscribed)
                .cloned()
                .collect(),
        )
    }
}

/// Outcome of pruning one topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PruneResult {
    pub topic_name: String,
    /// `None` when the topic was deleted.
    pub error: Option<String>,
}

impl PruneResult {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// One outcome per requested topic, in request order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct PruneResults(pub Vec<PruneResult>);

impl PruneResults {
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.0.iter().filter(|r| r.is_ok()).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.0.len() - self.succeeded()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PruneResult> {
        self.0.iter()
    }
}
