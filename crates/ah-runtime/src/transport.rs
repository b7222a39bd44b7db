//! Messenger and bus connections.

use crate::config::MessengerConfig;
use ah_01_state::StartupError;
use shared_bus::{Bus, InMemoryBus, InMemoryMessenger, Messenger};
use std::sync::Arc;
use tracing::info;

/// The two transports every process mode is wired to.
#[derive(Clone)]
pub struct Transport {
    pub messenger: Arc<dyn Messenger>,
    pub bus: Arc<dyn Bus>,
}

impl Transport {
    /// A fresh in-process messenger and bus.
    #[must_use]
    pub fn in_process() -> Self {
        Self {
            messenger: Arc::new(InMemoryMessenger::new()),
            bus: Arc::new(InMemoryBus::new()),
        }
    }
}

/// Connect to the transport named by `config`.
///
/// Only the in-process transport is available; any other host fails startup.
pub fn connect(config: &MessengerConfig) -> Result<Transport, StartupError> {
    if !config.is_in_process() {
        return Err(StartupError::Connect(format!(
            "no transport available for {}:{}",
            config.host, config.port
        )));
    }
    info!(host = %config.host, "Connected to in-process messenger and bus");
    Ok(Transport::in_process())
}
