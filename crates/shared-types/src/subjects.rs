//! # Subjects and Topics
//!
//! Closed enumerations of every messenger subject and bus topic this system
//! serves. The string forms are the wire contract shared with other
//! processes.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Request/reply subjects answered through the messenger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuerySubject {
    /// Region status lookup (the startup round trip).
    Status,
    /// Owners of the given items in one realm's live auctions.
    OwnersQueryByItems,
    /// A realm's modification markers.
    QueryRealmModificationDates,
}

impl QuerySubject {
    pub const ALL: [QuerySubject; 3] = [
        QuerySubject::Status,
        QuerySubject::OwnersQueryByItems,
        QuerySubject::QueryRealmModificationDates,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuerySubject::Status => "status",
            QuerySubject::OwnersQueryByItems => "ownersQueryByItems",
            QuerySubject::QueryRealmModificationDates => "queryRealmModificationDates",
        }
    }
}

/// Durable topics consumed from the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BusTopic {
    /// Triggers one remote compute-all-pricelist-histories call.
    CallComputeAllPricelistHistories,
    /// Triggers one topic lifecycle sync pass.
    SyncPubsubTopicsMonitor,
}

impl BusTopic {
    pub const ALL: [BusTopic; 2] = [
        BusTopic::CallComputeAllPricelistHistories,
        BusTopic::SyncPubsubTopicsMonitor,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BusTopic::CallComputeAllPricelistHistories => "callComputeAllPricelistHistories",
            BusTopic::SyncPubsubTopicsMonitor => "syncPubsubTopicsMonitor",
        }
    }
}

/// A string that names no known subject or topic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown subject: {0}")]
pub struct UnknownSubject(pub String);

impl FromStr for QuerySubject {
    type Err = UnknownSubject;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuerySubject::ALL
            .into_iter()
            .find(|subject| subject.as_str() == s)
            .ok_or_else(|| UnknownSubject(s.to_string()))
    }
}

impl FromStr for BusTopic {
    type Err = UnknownSubject;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BusTopic::ALL
            .into_iter()
            .find(|topic| topic.as_str() == s)
            .ok_or_else(|| UnknownSubject(s.to_string()))
    }
}

impl fmt::Display for QuerySubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for BusTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
