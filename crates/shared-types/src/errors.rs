//! # Error Types
//!
//! Error types used across subsystems.

use crate::codes::DatabaseCode;
use thiserror::Error;

/// Failure reported by a Database Store collaborator.
///
/// The code decides how the failure is reported on the wire; the message is
/// copied into the reply's error string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DatabaseError {
    pub code: DatabaseCode,
    pub message: String,
}

impl DatabaseError {
    pub fn new(code: DatabaseCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(DatabaseCode::NotFound, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(DatabaseCode::StorageFailure, message)
    }
}

/// Region or realm lookup miss against the process state.
///
/// Both variants are reported with the same wire code; only the message tells
/// them apart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("region not found")]
    RegionNotFound { region_name: String },

    #[error("realm not found")]
    RealmNotFound {
        region_name: String,
        realm_slug: String,
    },
}
