//! Bootstrap topology: the fixed region and realm set for a process lifetime.

use crate::domain::errors::StartupError;
use serde::{Deserialize, Serialize};
use shared_types::{Realm, Region, Status};
use std::collections::HashSet;
use std::path::Path;

/// One region as declared in the topology file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionConfig {
    pub name: String,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub realms: Vec<Realm>,
}

impl RegionConfig {
    #[must_use]
    pub fn region(&self) -> Region {
        Region {
            name: self.name.clone(),
            hostname: self.hostname.clone(),
            primary: self.primary,
        }
    }

    /// The region's status as declared, before any refresh.
    #[must_use]
    pub fn status(&self) -> Status {
        Status {
            region: self.region(),
            realms: self.realms.clone(),
        }
    }
}

/// Region and realm topology loaded at startup.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TopologyConfig {
    pub regions: Vec<RegionConfig>,
}

impl TopologyConfig {
    /// Decode and validate a JSON topology document.
    pub fn from_json(data: &[u8]) -> Result<Self, StartupError> {
        let topology: TopologyConfig =
            serde_json::from_slice(data).map_err(|e| StartupError::Topology(e.to_string()))?;
        topology.validate()?;
        Ok(topology)
    }

    /// Read a topology file.
    pub fn load(path: &Path) -> Result<Self, StartupError> {
        let data = std::fs::read(path).map_err(|e| {
            StartupError::Topology(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&data)
    }

    /// At least one region; names and per-region realm slugs are unique.
    pub fn validate(&self) -> Result<(), StartupError> {
        if self.regions.is_empty() {
            return Err(StartupError::NoRegions);
        }

        let mut names = HashSet::new();
        for region in &self.regions {
            if region.name.is_empty() {
                return Err(StartupError::Topology("region with empty name".to_string()));
            }
            if !names.insert(region.name.as_str()) {
                return Err(StartupError::Topology(format!(
                    "duplicate region: {}",
                    region.name
                )));
            }

            let mut slugs = HashSet::new();
            for realm in &region.realms {
                if !slugs.insert(realm.slug.as_str()) {
                    return Err(StartupError::Topology(format!(
                        "duplicate realm {} in region {}",
                        realm.slug, region.name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Regions in declaration order.
    #[must_use]
    pub fn regions(&self) -> Vec<Region> {
        self.regions.iter().map(RegionConfig::region).collect()
    }

    #[must_use]
    pub fn region(&self, name: &str) -> Option<&RegionConfig> {
        self.regions.iter().find(|r| r.name == name)
    }
}
