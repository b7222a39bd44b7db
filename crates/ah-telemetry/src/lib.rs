//! # Auction House Telemetry
//!
//! Logging and metrics for every process mode.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ah_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(&TelemetryConfig::for_mode("api"))?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `AH_SERVICE_NAME` | `auction-house` | Service name in logs |
//! | `AH_LOG_LEVEL` | `info` | Log filter, falls back to `RUST_LOG` |
//! | `AH_JSON_LOGS` | `false` | JSON log lines |

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod config;
mod logging;
pub mod metrics;
mod reporter;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, register_metrics, MetricsHandle, GATEWAY_CALLS, ORPHANED_TOPICS,
    QUERY_REPLIES, SYNC_DURATION, TOPICS_PRUNED,
};
pub use reporter::{Metrics, PrometheusReporter, RecordingReporter, Reporter};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Register metrics, then install logging.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics = register_metrics()?;
    init_logging(config)?;
    Ok(TelemetryGuard {
        service_name: config.service_name.clone(),
        _metrics: metrics,
    })
}

/// Guard that keeps telemetry active for the life of the process.
pub struct TelemetryGuard {
    service_name: String,
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry");
    }
}
