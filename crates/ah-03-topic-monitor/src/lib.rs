//! # Topic Lifecycle Monitor (ah-03)
//!
//! Bus topics outlive their subscribers. Ephemeral consumers (request reply
//! topics, short-lived workers) leave orphaned topics behind, and those cost
//! resources until deleted.
//!
//! Each sync pass records when every orphan was last seen. A topic is pruned
//! only after it was recorded on an earlier pass and has then stayed orphaned
//! for longer than the retention window, so topics that are merely between
//! subscribers survive.
//!
//! Passes are triggered by messages on the `syncPubsubTopicsMonitor` topic;
//! there is no internal timer.
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Config, errors, pass report
//! - `ports/` - Registry and time source traits
//! - `adapters/` - In-memory and JSON-file registries, clocks
//! - `service.rs` - The sync pass
//! - `ipc/` - Trigger listener

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod ipc;
pub mod ports;
pub mod service;

#[cfg(test)]
mod test_utils;

pub use adapters::{InMemoryTopicRegistry, JsonFileTopicRegistry, ManualClock, SystemTimeSource};
pub use domain::config::{
    AgeEvaluation, MonitorConfig, UnknownAgeEvaluation, DEFAULT_RETENTION_SECS,
};
pub use domain::errors::{RegistryError, SyncError};
pub use domain::report::{SyncReport, SYNC_DURATION_METRIC, TOPIC_COUNT_METRIC};
pub use ipc::listen_for_sync;
pub use ports::outbound::{TimeSource, TopicRecordRegistry};
pub use service::TopicMonitor;
