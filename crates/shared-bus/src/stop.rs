//! Cooperative stop signals.
//!
//! A stop signal is a `watch` channel carrying `true` once stop is requested.
//! Dropping the [`StopHandle`] also counts as a stop.

use tokio::sync::watch;

/// Receiving side, handed to every subscription.
pub type StopSignal = watch::Receiver<bool>;

/// Sending side, kept by whoever owns the subscriptions.
#[derive(Debug)]
pub struct StopHandle(watch::Sender<bool>);

impl StopHandle {
    /// Request stop for every signal cloned from this handle.
    pub fn stop(&self) {
        self.0.send_replace(true);
    }

    /// Another receiver for the same stop.
    #[must_use]
    pub fn signal(&self) -> StopSignal {
        self.0.subscribe()
    }
}

/// Create a fresh, unsignalled stop pair.
#[must_use]
pub fn stop_channel() -> (StopHandle, StopSignal) {
    let (tx, rx) = watch::channel(false);
    (StopHandle(tx), rx)
}

/// Resolve once stop has been requested or the handle dropped.
pub async fn wait_for_stop(signal: &mut StopSignal) {
    while !*signal.borrow_and_update() {
        if signal.changed().await.is_err() {
            return;
        }
    }
}
