//! Monitor configuration.

use serde::{Deserialize, Serialize};
use shared_bus::DEFAULT_PAGE_SIZE;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Retention window after which an orphaned topic may be pruned.
pub const DEFAULT_RETENTION_SECS: u64 = 60 * 60;

/// Which records decide whether an orphan has expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgeEvaluation {
    /// Ages come from the records as they stood before this pass refreshed
    /// them. A topic orphaned on the previous pass and still orphaned more
    /// than the retention window later is pruned.
    #[default]
    BeforeRefresh,
    /// Ages come from the records after this pass refreshed them. A topic that
    /// every pass sees orphaned never ages out; only topics whose orphan
    /// status went unobserved for longer than the window are pruned. Records
    /// of topics no longer orphaned are kept and aged with the rest.
    AfterRefresh,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown age evaluation: {0} (expected before-refresh or after-refresh)")]
pub struct UnknownAgeEvaluation(pub String);

impl AgeEvaluation {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AgeEvaluation::BeforeRefresh => "before-refresh",
            AgeEvaluation::AfterRefresh => "after-refresh",
        }
    }
}

impl FromStr for AgeEvaluation {
    type Err = UnknownAgeEvaluation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "before-refresh" => Ok(AgeEvaluation::BeforeRefresh),
            "after-refresh" => Ok(AgeEvaluation::AfterRefresh),
            other => Err(UnknownAgeEvaluation(other.to_string())),
        }
    }
}

impl fmt::Display for AgeEvaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tuning for one monitor instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    pub retention_secs: u64,
    pub page_size: usize,
    pub age_evaluation: AgeEvaluation,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            retention_secs: DEFAULT_RETENTION_SECS,
            page_size: DEFAULT_PAGE_SIZE,
            age_evaluation: AgeEvaluation::default(),
        }
    }
}

impl MonitorConfig {
    #[must_use]
    pub fn with_age_evaluation(mut self, age_evaluation: AgeEvaluation) -> Self {
        self.age_evaluation = age_evaluation;
        self
    }

    #[must_use]
    pub fn with_retention_secs(mut self, retention_secs: u64) -> Self {
        self.retention_secs = retention_secs;
        self
    }
}
