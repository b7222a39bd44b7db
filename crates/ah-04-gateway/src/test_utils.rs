//! Test doubles for the gateway invoker.

use crate::domain::errors::GatewayError;
use crate::ports::outbound::RemoteGateway;
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_bus::{
    Bus, BusError, BusMessage, InMemoryBus, PruneResults, SubscribeConfig,
    SubscriptionCheckResults,
};
use shared_types::RegionRealmTimestampTuples;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Acked,
    Rejected,
    Invoked,
}

/// Shared, ordered record of what the bus and the gateway saw.
#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<Event>>>);

impl EventLog {
    pub fn push(&self, event: Event) {
        self.0.lock().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().clone()
    }
}

/// In-memory bus that logs every reply at the moment it is sent.
pub struct RecordingBus {
    pub inner: InMemoryBus,
    log: EventLog,
}

impl RecordingBus {
    pub fn new(log: EventLog) -> Self {
        Self {
            inner: InMemoryBus::new(),
            log,
        }
    }
}

#[async_trait]
impl Bus for RecordingBus {
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
        self.log.push(if reply.is_ok() {
            Event::Acked
        } else {
            Event::Rejected
        });
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
        self.inner.check_all_subscriptions(page_size).await
    }

    async fn prune_topics(&self, names: &[String]) -> PruneResults {
        self.inner.prune_topics(names).await
    }
}

/// Gateway that records each call on entry, then optionally waits or fails.
pub struct StubGateway {
    log: EventLog,
    calls: Mutex<Vec<RegionRealmTimestampTuples>>,
    delay: Option<Duration>,
    gate: Option<Arc<Semaphore>>,
    fail: bool,
}

impl StubGateway {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            calls: Mutex::new(Vec::new()),
            delay: None,
            gate: None,
            fail: false,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn calls(&self) -> Vec<RegionRealmTimestampTuples> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl RemoteGateway for StubGateway {
    async fn compute_all_pricelist_histories(
        &self,
        tuples: &RegionRealmTimestampTuples,
    ) -> Result<(), GatewayError> {
        self.log.push(Event::Invoked);
        self.calls.lock().push(tuples.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        if self.fail {
            return Err(GatewayError::Connection("stub".into()));
        }
        Ok(())
    }
}
