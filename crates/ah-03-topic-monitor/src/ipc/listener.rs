//! Sync trigger listener.
//!
//! Each message on the sync topic asks for one pass. Triggers are funnelled
//! into a single worker through a one-slot channel: while a pass is queued,
//! further triggers are coalesced into it.

use crate::service::TopicMonitor;
use async_trait::async_trait;
use shared_bus::{
    Bus, BusCallback, BusError, BusMessage, StopSignal, SubscribeConfig, SubscriptionSignals,
};
use shared_types::BusTopic;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, error, info, warn};

struct SyncTrigger {
    bus: Arc<dyn Bus>,
    pending: mpsc::Sender<()>,
}

#[async_trait]
impl BusCallback for SyncTrigger {
    async fn on_message(&self, message: BusMessage) {
        info!(bus_msg_code = ?message.code, "Received sync trigger");

        match self.pending.try_send(()) {
            Ok(()) => {}
            Err(TrySendError::Full(())) => debug!("Sync already pending, trigger coalesced"),
            Err(TrySendError::Closed(())) => warn!("Sync worker gone, trigger dropped"),
        }

        if message.reply_to.is_some() {
            if let Err(e) = self.bus.reply_to(&message, BusMessage::new()).await {
                error!(error = %e, "Failed to acknowledge sync trigger");
            }
        }
    }
}

/// Subscribe to the sync topic and start the worker.
///
/// The worker runs passes until the subscription stops and every queued
/// trigger has been handled.
pub async fn listen_for_sync(
    monitor: Arc<TopicMonitor>,
    bus: Arc<dyn Bus>,
    stop: StopSignal,
) -> Result<SubscriptionSignals, BusError> {
    let (pending, mut triggers) = mpsc::channel::<()>(1);

    tokio::spawn(async move {
        while triggers.recv().await.is_some() {
            if let Err(e) = monitor.sync().await {
                error!(error = %e, "Failed to sync topics");
            }
        }
        debug!("Sync worker stopped");
    });

    let callback = Arc::new(SyncTrigger {
        bus: Arc::clone(&bus),
        pending,
    });
    let (config, signals) = SubscribeConfig::with_signals(stop, callback);
    bus.subscribe_to_topic(BusTopic::SyncPubsubTopicsMonitor.as_str(), config)
        .await?;
    info!(topic = %BusTopic::SyncPubsubTopicsMonitor, "Listening for sync triggers");

    Ok(signals)
}
