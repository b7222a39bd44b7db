//! # Domain Errors
//!
//! Startup is fail-fast: every step surfaces a [`StartupError`] and the
//! process does not start.

use shared_bus::MessengerError;
use shared_types::MessengerCode;
use std::path::PathBuf;
use thiserror::Error;

/// Failure fetching one region's status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatusSourceError {
    #[error("status request failed: {0}")]
    Transport(#[from] MessengerError),

    #[error("status request rejected with {code}: {err}")]
    Rejected { code: MessengerCode, err: String },

    #[error("failed to decode status: {0}")]
    Decode(String),

    #[error("no status for region {0}")]
    UnknownRegion(String),
}

/// Failure creating a storage namespace.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to provision {path}: {message}")]
pub struct ProvisionError {
    pub path: PathBuf,
    pub message: String,
}

/// Any failure during the startup sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartupError {
    #[error("failed to connect messenger: {0}")]
    Connect(String),

    #[error("invalid topology: {0}")]
    Topology(String),

    #[error("topology declares no regions")]
    NoRegions,

    #[error("failed to fetch status for region {region_name}: {source}")]
    StatusFetch {
        region_name: String,
        source: StatusSourceError,
    },

    #[error("status for region {requested} names region {returned}")]
    StatusMismatch { requested: String, returned: String },

    #[error(transparent)]
    Provision(#[from] ProvisionError),
}

/// Failure replacing the status map after startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("status for unknown region {0}")]
    UnknownRegion(String),

    #[error("no status for region {0}")]
    MissingRegion(String),

    #[error("failed to refresh status for region {region_name}: {source}")]
    Refresh {
        region_name: String,
        source: StatusSourceError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_fetch_names_region() {
        let err = StartupError::StatusFetch {
            region_name: "eu".into(),
            source: StatusSourceError::Transport(MessengerError::NoResponders("status".into())),
        };
        let text = err.to_string();
        assert!(text.contains("eu"));
        assert!(text.contains("status"));
    }
}
