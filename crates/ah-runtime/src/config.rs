//! # Runtime Configuration
//!
//! Defaults overridden by environment variables. The process mode may also be
//! given as the first positional argument, which wins over `AH_COMMAND`.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `AH_COMMAND` | - | Process mode |
//! | `AH_MESSENGER_HOST` | `in-process` | Messenger host |
//! | `AH_MESSENGER_PORT` | `4222` | Messenger port |
//! | `AH_CACHE_DIR` | `./cache` | Root of the databases directory |
//! | `AH_CONFIG_FILEPATH` | - | Topology JSON file |
//! | `AH_GATEWAY_ENDPOINT` | - | Remote gateway base URL |
//! | `AH_STATUS_TIMEOUT_SECS` | `5` | Status round trip timeout |
//! | `AH_TOPIC_RETENTION_SECS` | `3600` | Orphaned topic retention |
//! | `AH_AGE_EVALUATION` | `before-refresh` | Record set expiry is judged on |

use ah_01_state::{ProcessMode, UnknownMode};
use ah_03_topic_monitor::{AgeEvaluation, MonitorConfig, DEFAULT_RETENTION_SECS};
use ah_04_gateway::DEFAULT_QUEUE_CAPACITY;
use shared_bus::DEFAULT_REQUEST_TIMEOUT;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Host name selecting the in-process transport.
pub const IN_PROCESS_HOST: &str = "in-process";

/// Topic registry file name inside the databases directory.
pub const TOPIC_REGISTRY_FILE: &str = "pubsub-topics.json";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no process mode given; pass one of api, live-auctions, pricelist-histories, pubsub-topics-monitor, gateway, standalone")]
    MissingMode,

    #[error(transparent)]
    UnknownMode(#[from] UnknownMode),

    #[error("invalid {var}={value}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("AH_CONFIG_FILEPATH is required for mode {0}")]
    MissingTopology(ProcessMode),

    #[error("AH_GATEWAY_ENDPOINT is required for mode {0}")]
    MissingGatewayEndpoint(ProcessMode),
}

/// Where the messenger and bus live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessengerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for MessengerConfig {
    fn default() -> Self {
        Self {
            host: IN_PROCESS_HOST.to_string(),
            port: 4222,
        }
    }
}

impl MessengerConfig {
    #[must_use]
    pub fn is_in_process(&self) -> bool {
        self.host == IN_PROCESS_HOST
    }
}

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub mode: ProcessMode,
    pub messenger: MessengerConfig,
    pub cache_dir: PathBuf,
    pub topology_path: PathBuf,
    pub gateway_endpoint: Option<String>,
    pub status_timeout: Duration,
    pub monitor: MonitorConfig,
    pub gateway_queue_capacity: usize,
}

impl RuntimeConfig {
    /// Defaults for `mode`, reading topology from `topology_path`.
    pub fn new(mode: ProcessMode, topology_path: impl Into<PathBuf>) -> Self {
        Self {
            mode,
            messenger: MessengerConfig::default(),
            cache_dir: PathBuf::from("./cache"),
            topology_path: topology_path.into(),
            gateway_endpoint: None,
            status_timeout: DEFAULT_REQUEST_TIMEOUT,
            monitor: MonitorConfig::default(),
            gateway_queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }

    /// Load from the process arguments and environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::from_lookup(&args, |key| std::env::var(key).ok())
    }

    /// Load from `args` (without the program name) and a variable lookup.
    pub fn from_lookup(
        args: &[String],
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let command = args
            .first()
            .cloned()
            .or_else(|| lookup("AH_COMMAND"))
            .filter(|c| !c.is_empty())
            .ok_or(ConfigError::MissingMode)?;
        let mode: ProcessMode = command.parse()?;

        let topology_path = lookup("AH_CONFIG_FILEPATH")
            .filter(|p| !p.is_empty())
            .ok_or(ConfigError::MissingTopology(mode))?;
        let mut config = Self::new(mode, topology_path);

        if let Some(host) = lookup("AH_MESSENGER_HOST") {
            config.messenger.host = host;
        }
        if let Some(port) = lookup("AH_MESSENGER_PORT") {
            config.messenger.port = parse("AH_MESSENGER_PORT", &port)?;
        }
        if let Some(dir) = lookup("AH_CACHE_DIR") {
            config.cache_dir = PathBuf::from(dir);
        }
        config.gateway_endpoint = lookup("AH_GATEWAY_ENDPOINT").filter(|e| !e.is_empty());
        if let Some(secs) = lookup("AH_STATUS_TIMEOUT_SECS") {
            config.status_timeout = Duration::from_secs(parse("AH_STATUS_TIMEOUT_SECS", &secs)?);
        }
        if let Some(secs) = lookup("AH_TOPIC_RETENTION_SECS") {
            config.monitor.retention_secs = parse("AH_TOPIC_RETENTION_SECS", &secs)?;
        }
        if let Some(value) = lookup("AH_AGE_EVALUATION") {
            let age_evaluation: AgeEvaluation = parse("AH_AGE_EVALUATION", &value)?;
            config.monitor = config.monitor.with_age_evaluation(age_evaluation);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that every collaborator the mode needs is configured.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mode.hosts(ProcessMode::Gateway) && self.gateway_endpoint.is_none() {
            return Err(ConfigError::MissingGatewayEndpoint(self.mode));
        }
        Ok(())
    }

    /// `<cache_dir>/databases`
    #[must_use]
    pub fn databases_dir(&self) -> PathBuf {
        self.cache_dir.join("databases")
    }

    /// `<cache_dir>/databases/pubsub-topics.json`
    #[must_use]
    pub fn topic_registry_path(&self) -> PathBuf {
        self.databases_dir().join(TOPIC_REGISTRY_FILE)
    }
}

fn parse<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })
}
