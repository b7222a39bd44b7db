//! Monitor errors.

use shared_bus::BusError;
use std::path::PathBuf;
use thiserror::Error;

/// Topic record registry failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("registry i/o on {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("registry data is corrupt: {0}")]
    Corrupt(String),
}

/// A sync pass that could not complete.
///
/// Individual prune failures are not errors; they are reported per topic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("subscription scan failed: {0}")]
    Scan(#[from] BusError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
