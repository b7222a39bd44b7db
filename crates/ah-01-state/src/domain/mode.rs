//! Process roles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Kind of on-disk storage namespace a role keeps per (region, realm).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NamespaceKind {
    LiveAuctions,
    PricelistHistories,
}

impl NamespaceKind {
    /// Directory name under the databases root.
    #[must_use]
    pub fn dir_name(self) -> &'static str {
        match self {
            NamespaceKind::LiveAuctions => "live-auctions",
            NamespaceKind::PricelistHistories => "pricelist-histories",
        }
    }
}

/// The role a process plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProcessMode {
    /// Answers status and realm-modification-dates queries.
    Api,
    /// Answers owners-by-items queries over live auctions.
    LiveAuctions,
    /// Holds pricelist-history namespaces.
    PricelistHistories,
    /// Garbage-collects orphaned bus topics.
    PubsubTopicsMonitor,
    /// Forwards compute triggers to the remote gateway.
    Gateway,
    /// Every role in one process.
    Standalone,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown process mode: {0}")]
pub struct UnknownMode(pub String);

impl ProcessMode {
    pub const ALL: [ProcessMode; 6] = [
        ProcessMode::Api,
        ProcessMode::LiveAuctions,
        ProcessMode::PricelistHistories,
        ProcessMode::PubsubTopicsMonitor,
        ProcessMode::Gateway,
        ProcessMode::Standalone,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProcessMode::Api => "api",
            ProcessMode::LiveAuctions => "live-auctions",
            ProcessMode::PricelistHistories => "pricelist-histories",
            ProcessMode::PubsubTopicsMonitor => "pubsub-topics-monitor",
            ProcessMode::Gateway => "gateway",
            ProcessMode::Standalone => "standalone",
        }
    }

    /// Storage namespaces this role provisions at startup.
    #[must_use]
    pub fn namespace_kinds(self) -> &'static [NamespaceKind] {
        match self {
            ProcessMode::LiveAuctions => &[NamespaceKind::LiveAuctions],
            ProcessMode::PricelistHistories => &[NamespaceKind::PricelistHistories],
            ProcessMode::Standalone => {
                &[NamespaceKind::LiveAuctions, NamespaceKind::PricelistHistories]
            }
            ProcessMode::Api | ProcessMode::PubsubTopicsMonitor | ProcessMode::Gateway => &[],
        }
    }

    /// Whether this role answers the `status` subject itself.
    #[must_use]
    pub fn serves_status(self) -> bool {
        matches!(self, ProcessMode::Api | ProcessMode::Standalone)
    }

    /// Whether `other`'s listeners run in this process.
    #[must_use]
    pub fn hosts(self, other: ProcessMode) -> bool {
        self == other || self == ProcessMode::Standalone
    }
}

impl FromStr for ProcessMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProcessMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| UnknownMode(s.to_string()))
    }
}

impl fmt::Display for ProcessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
