//! Shared fixtures for unit tests.

use async_trait::async_trait;
use shared_bus::{
    Bus, BusError, BusMessage, InMemoryBus, PruneResult, PruneResults, SubscribeConfig,
    SubscriptionCheckResults,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// In-memory bus with injectable prune failures and an optional gate that
/// holds every subscription scan until a permit is released.
pub struct TestBus {
    pub inner: InMemoryBus,
    fail_prune: HashSet<String>,
    gate: Option<Arc<Semaphore>>,
    scans: AtomicUsize,
}

impl TestBus {
    pub fn new() -> Self {
        Self {
            inner: InMemoryBus::new(),
            fail_prune: HashSet::new(),
            gate: None,
            scans: AtomicUsize::new(0),
        }
    }

    pub fn failing_prune(names: &[&str]) -> Self {
        Self {
            fail_prune: names.iter().map(|s| s.to_string()).collect(),
            ..Self::new()
        }
    }

    pub fn gated(gate: Arc<Semaphore>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new()
        }
    }

    pub fn scans(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Bus for TestBus {
    async fn subscribe_to_topic(
        &self,
        topic: &str,
        config: SubscribeConfig,
    ) -> Result<(), BusError> {
        self.inner.subscribe_to_topic(topic, config).await
    }

    async fn publish(&self, topic: &str, message: BusMessage) -> Result<String, BusError> {
        self.inner.publish(topic, message).await
    }

    async fn reply_to(
        &self,
        message: &BusMessage,
        reply: BusMessage,
    ) -> Result<String, BusError> {
        self.inner.reply_to(message, reply).await
    }

    async fn request(
        &self,
        topic: &str,
        message: BusMessage,
        timeout: Duration,
    ) -> Result<BusMessage, BusError> {
        self.inner.request(topic, message, timeout).await
    }

    async fn check_all_subscriptions(
        &self,
        page_size: usize,
    ) -> Result<SubscriptionCheckResults, BusError> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|e| BusError::Connection(e.to_string()))?;
            permit.forget();
        }
        self.inner.check_all_subscriptions(page_size).await
    }

    async fn prune_topics(&self, names: &[String]) -> PruneResults {
        let mut results = Vec::with_capacity(names.len());
        for name in names {
            if self.fail_prune.contains(name) {
                results.push(PruneResult {
                    topic_name: name.clone(),
                    error: Some("injected failure".to_string()),
                });
            } else {
                results.extend(self.inner.prune_topics(std::slice::from_ref(name)).await.0);
            }
        }
        PruneResults(results)
    }
}
