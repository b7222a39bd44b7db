//! Compute trigger listener.
//!
//! Each message on the compute topic carries a tuple list. The trigger is
//! acknowledged first, then queued for a single worker that calls the remote
//! gateway. Remote outcomes never reach the requester.

use crate::ports::outbound::RemoteGateway;
use ah_telemetry::GATEWAY_CALLS;
use async_trait::async_trait;
use shared_bus::{
    Bus, BusCallback, BusError, BusMessage, StopSignal, SubscribeConfig, SubscriptionSignals,
};
use shared_types::{BusCode, BusTopic, RegionRealmTimestampTuples};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, error, info, warn};

/// Capacity of the pending-call queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 32;

struct ComputeTrigger {
    bus: Arc<dyn Bus>,
    pending: mpsc::Sender<RegionRealmTimestampTuples>,
}

#[async_trait]
impl BusCallback for ComputeTrigger {
    async fn on_message(&self, message: BusMessage) {
        info!(bus_msg_code = ?message.code, "Received compute trigger");

        let tuples = match RegionRealmTimestampTuples::decode(message.data.as_bytes()) {
            Ok(tuples) => tuples,
            Err(e) => {
                warn!(error = %e, "Failed to decode region-realm-timestamp tuples");
                GATEWAY_CALLS.with_label_values(&["rejected"]).inc();
                if let Err(e) = self
                    .bus
                    .reply_to_with_error(&message, &e.to_string(), BusCode::GenericError)
                    .await
                {
                    error!(error = %e, "Failed to reply with decode error");
                }
                return;
            }
        };

        if message.reply_to.is_some() {
            if let Err(e) = self.bus.reply_to(&message, BusMessage::new()).await {
                error!(error = %e, "Failed to acknowledge compute trigger");
                return;
            }
        } else {
            debug!("Compute trigger has no reply topic, nothing to acknowledge");
        }

        match self.pending.try_send(tuples) {
            Ok(()) => {}
            Err(TrySendError::Full(tuples)) => {
                warn!(tuples = tuples.len(), "Compute queue full, trigger dropped");
                GATEWAY_CALLS.with_label_values(&["dropped"]).inc();
            }
            Err(TrySendError::Closed(_)) => {
                warn!("Compute worker gone, trigger dropped");
                GATEWAY_CALLS.with_label_values(&["dropped"]).inc();
            }
        }
    }
}

/// Subscribe to the compute topic and start the worker.
///
/// Calls run one at a time in arrival order. At most `capacity` acknowledged
/// triggers wait for the worker; beyond that they are dropped.
pub async fn listen_for_compute(
    gateway: Arc<dyn RemoteGateway>,
    bus: Arc<dyn Bus>,
    stop: StopSignal,
    capacity: usize,
) -> Result<SubscriptionSignals, BusError> {
    let (pending, mut calls) = mpsc::channel::<RegionRealmTimestampTuples>(capacity.max(1));

    tokio::spawn(async move {
        while let Some(tuples) = calls.recv().await {
            match gateway.compute_all_pricelist_histories(&tuples).await {
                Ok(()) => {
                    GATEWAY_CALLS.with_label_values(&["ok"]).inc();
                }
                Err(e) => {
                    GATEWAY_CALLS.with_label_values(&["failed"]).inc();
                    error!(error = %e, tuples = tuples.len(), "Failed to call compute-all-pricelist-histories");
                }
            }
        }
        debug!("Compute worker stopped");
    });

    let callback = Arc::new(ComputeTrigger {
        bus: Arc::clone(&bus),
        pending,
    });
    let (config, signals) = SubscribeConfig::with_signals(stop, callback);
    bus.subscribe_to_topic(BusTopic::CallComputeAllPricelistHistories.as_str(), config)
        .await?;
    info!(topic = %BusTopic::CallComputeAllPricelistHistories, "Listening for compute triggers");

    Ok(signals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{Event, EventLog, RecordingBus, StubGateway};
    use shared_bus::stop_channel;
    use shared_types::RegionRealmTimestampTuple;
    use std::time::Duration;
    use tokio::sync::Semaphore;
    use tokio::time::{sleep, timeout};

    const TOPIC: &str = "callComputeAllPricelistHistories";

    fn payload(realm: &str) -> BusMessage {
        let tuples: RegionRealmTimestampTuples = vec![RegionRealmTimestampTuple {
            region_name: "us".into(),
            realm_slug: realm.into(),
            target_timestamp: 1_700_000_000,
        }]
        .into_iter()
        .collect();
        BusMessage::with_data(String::from_utf8(tuples.encode().unwrap()).unwrap())
    }

    async fn wait_for(mut done: impl FnMut() -> bool) {
        timeout(Duration::from_secs(2), async {
            while !done() {
                sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("condition in time");
    }

    #[tokio::test]
    async fn test_ack_precedes_remote_call() {
        let log = EventLog::default();
        let bus = Arc::new(RecordingBus::new(log.clone()));
        let gateway = Arc::new(StubGateway::new(log.clone()).with_delay(Duration::from_millis(200)));
        let (_stop, signal) = stop_channel();
        listen_for_compute(gateway.clone(), bus.clone(), signal, DEFAULT_QUEUE_CAPACITY)
            .await
            .unwrap();

        let reply = bus
            .request(TOPIC, payload("tichondrius"), Duration::from_secs(1))
            .await
            .unwrap();
        assert!(reply.is_ok());
        assert!(reply.data.is_empty());

        wait_for(|| gateway.calls().len() == 1).await;
        assert_eq!(log.events(), vec![Event::Acked, Event::Invoked]);
        assert_eq!(gateway.calls()[0].0[0].realm_slug, "tichondrius");
    }

    #[tokio::test]
    async fn test_decode_failure_is_rejected() {
        let log = EventLog::default();
        let bus = Arc::new(RecordingBus::new(log.clone()));
        let gateway = Arc::new(StubGateway::new(log.clone()));
        let (_stop, signal) = stop_channel();
        listen_for_compute(gateway.clone(), bus.clone(), signal, DEFAULT_QUEUE_CAPACITY)
            .await
            .unwrap();

        let reply = bus
            .request(TOPIC, BusMessage::with_data("not json"), Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(reply.code, BusCode::GenericError);
        assert!(!reply.err.is_empty());

        sleep(Duration::from_millis(50)).await;
        assert!(gateway.calls().is_empty());
        assert_eq!(log.events(), vec![Event::Rejected]);
    }

    #[tokio::test]
    async fn test_remote_failure_does_not_stop_worker() {
        let log = EventLog::default();
        let bus = Arc::new(RecordingBus::new(log.clone()));
        let gateway = Arc::new(StubGateway::new(log.clone()).failing());
        let (_stop, signal) = stop_channel();
        listen_for_compute(gateway.clone(), bus.clone(), signal, DEFAULT_QUEUE_CAPACITY)
            .await
            .unwrap();

        for realm in ["tichondrius", "stormrage"] {
            let reply = bus
                .request(TOPIC, payload(realm), Duration::from_secs(1))
                .await
                .unwrap();
            assert!(reply.is_ok());
        }

        wait_for(|| gateway.calls().len() == 2).await;
    }

    #[tokio::test]
    async fn test_trigger_without_reply_topic_is_processed() {
        let log = EventLog::default();
        let bus = Arc::new(RecordingBus::new(log.clone()));
        let gateway = Arc::new(StubGateway::new(log.clone()));
        let (_stop, signal) = stop_channel();
        listen_for_compute(gateway.clone(), bus.clone(), signal, DEFAULT_QUEUE_CAPACITY)
            .await
            .unwrap();

        bus.publish(TOPIC, payload("tichondrius")).await.unwrap();

        wait_for(|| gateway.calls().len() == 1).await;
        assert_eq!(log.events(), vec![Event::Invoked]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_full_queue_drops_triggers() {
        let log = EventLog::default();
        let gate = Arc::new(Semaphore::new(0));
        let bus = Arc::new(RecordingBus::new(log.clone()));
        let gateway = Arc::new(StubGateway::new(log.clone()).gated(Arc::clone(&gate)));
        let (_stop, signal) = stop_channel();
        listen_for_compute(gateway.clone(), bus.clone(), signal, 1)
            .await
            .unwrap();

        // First call parks the worker on the gate.
        bus.request(TOPIC, payload("a"), Duration::from_secs(1))
            .await
            .unwrap();
        wait_for(|| gateway.calls().len() == 1).await;

        // One fits in the queue, the rest are acknowledged and dropped.
        for realm in ["b", "c", "d"] {
            let reply = bus
                .request(TOPIC, payload(realm), Duration::from_secs(1))
                .await
                .unwrap();
            assert!(reply.is_ok());
        }

        gate.add_permits(10);
        wait_for(|| gateway.calls().len() == 2).await;
        sleep(Duration::from_millis(50)).await;

        let realms: Vec<String> = gateway
            .calls()
            .iter()
            .map(|tuples| tuples.0[0].realm_slug.clone())
            .collect();
        assert_eq!(realms, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_stop_fires_on_stopped() {
        let log = EventLog::default();
        let bus = Arc::new(RecordingBus::new(log.clone()));
        let gateway = Arc::new(StubGateway::new(log));
        let (stop, signal) = stop_channel();
        let signals = listen_for_compute(gateway, bus.clone(), signal, DEFAULT_QUEUE_CAPACITY)
            .await
            .unwrap();

        stop.stop();
        timeout(Duration::from_secs(1), signals.on_stopped)
            .await
            .expect("stopped in time")
            .expect("stopped sent");
        assert_eq!(bus.inner.subscription_count(TOPIC), 0);
    }
}
