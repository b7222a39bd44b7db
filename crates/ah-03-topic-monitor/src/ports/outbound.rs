//! # Outbound Ports (Driven Side)

use crate::domain::errors::RegistryError;
use shared_types::TopicRecords;

/// Persistent last-seen timestamps for orphaned topics.
///
/// Mutated only by the sync pass.
pub trait TopicRecordRegistry: Send + Sync {
    /// Every stored record.
    fn records(&self) -> Result<TopicRecords, RegistryError>;

    /// Overwrite the timestamp of each name with `now` and return the full
    /// updated record set.
    fn fill(&self, names: &[String], now: u64) -> Result<TopicRecords, RegistryError>;

    /// Remove the named records. Unknown names are ignored.
    fn clean(&self, names: &[String]) -> Result<(), RegistryError>;
}

/// Abstract interface for time operations (for testability).
pub trait TimeSource: Send + Sync {
    /// Current timestamp in seconds since epoch.
    fn now(&self) -> u64;
}
