//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for logging and metrics.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Filter directive (trace, debug, info, warn, error, or a full EnvFilter)
    pub log_level: String,

    /// Emit JSON log lines instead of human-readable ones
    pub json_logs: bool,

    /// Include the event target in human-readable output
    pub with_target: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "auction-house".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            with_target: true,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `AH_SERVICE_NAME`: Service name (default: auction-house)
    /// - `AH_LOG_LEVEL` or `RUST_LOG`: Log filter (default: info)
    /// - `AH_JSON_LOGS`: Enable JSON logs (default: false in dev, true in containers)
    /// - `AH_LOG_TARGET`: Include targets in human output (default: true)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("AH_SERVICE_NAME")
                .unwrap_or_else(|_| "auction-house".to_string()),

            log_level: env::var("AH_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            json_logs: env::var("AH_JSON_LOGS")
                .map(|v| parse_flag(&v))
                .unwrap_or(is_container),

            with_target: env::var("AH_LOG_TARGET")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),
        }
    }

    /// Configuration for one process mode, e.g. `pubsub-topics-monitor`.
    pub fn for_mode(mode: &str) -> Self {
        let mut config = Self::from_env();
        config.service_name = config.full_service_name(mode);
        config
    }

    /// Service name suffixed with the process mode.
    pub fn full_service_name(&self, mode: &str) -> String {
        if mode.is_empty() {
            self.service_name.clone()
        } else {
            format!("{}-{}", self.service_name, mode)
        }
    }
}

fn parse_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}
