//! # State Context Service
//!
//! [`StateContext`] is built once per process by [`StateContext::bootstrap`]
//! and shared by reference with every handler.

use crate::domain::errors::{StartupError, StateError};
use crate::domain::mode::ProcessMode;
use crate::domain::topology::TopologyConfig;
use crate::ports::outbound::{NamespaceProvisioner, StatusSource};
use parking_lot::RwLock;
use shared_types::{LookupError, Realm, Region, Status, Statuses};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Per-process regions and statuses.
///
/// Region identity is fixed at startup. Status values may be replaced later,
/// but only by swapping the whole map.
pub struct StateContext {
    run_id: Uuid,
    mode: ProcessMode,
    regions: Vec<Region>,
    statuses: RwLock<Arc<Statuses>>,
    status_source: Arc<dyn StatusSource>,
}

impl StateContext {
    /// Run the startup sequence.
    ///
    /// Regions come from `topology`. One status round trip is made per
    /// region, in declaration order. Every (region, realm) pair then gets a
    /// storage namespace for each kind the mode needs. The first failure
    /// aborts startup.
    #[instrument(skip_all, fields(mode = %mode))]
    pub async fn bootstrap(
        mode: ProcessMode,
        topology: &TopologyConfig,
        status_source: Arc<dyn StatusSource>,
        provisioner: &dyn NamespaceProvisioner,
    ) -> Result<Self, StartupError> {
        topology.validate()?;
        let regions = topology.regions();

        let mut statuses = Statuses::with_capacity(regions.len());
        for region in &regions {
            let status = status_source
                .fetch_status(&region.name)
                .await
                .map_err(|source| StartupError::StatusFetch {
                    region_name: region.name.clone(),
                    source,
                })?;
            if status.region.name != region.name {
                return Err(StartupError::StatusMismatch {
                    requested: region.name.clone(),
                    returned: status.region.name,
                });
            }
            statuses.insert(region.name.clone(), status);
        }

        let mut provisioned = 0usize;
        for kind in mode.namespace_kinds() {
            for region in &regions {
                let Some(status) = statuses.get(&region.name) else {
                    continue;
                };
                for realm in &status.realms {
                    provisioner.ensure_namespace(*kind, &region.name, &realm.slug)?;
                    provisioned += 1;
                }
            }
        }

        let run_id = Uuid::new_v4();
        info!(
            run_id = %run_id,
            regions = regions.len(),
            namespaces = provisioned,
            "State context ready"
        );

        Ok(Self {
            run_id,
            mode,
            regions,
            statuses: RwLock::new(Arc::new(statuses)),
            status_source,
        })
    }

    #[must_use]
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    #[must_use]
    pub fn mode(&self) -> ProcessMode {
        self.mode
    }

    #[must_use]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region(&self, region_name: &str) -> Result<&Region, LookupError> {
        self.regions
            .iter()
            .find(|r| r.name == region_name)
            .ok_or_else(|| LookupError::RegionNotFound {
                region_name: region_name.to_string(),
            })
    }

    /// Current status snapshot.
    #[must_use]
    pub fn statuses(&self) -> Arc<Statuses> {
        Arc::clone(&self.statuses.read())
    }

    pub fn status(&self, region_name: &str) -> Result<Status, LookupError> {
        self.statuses()
            .get(region_name)
            .cloned()
            .ok_or_else(|| LookupError::RegionNotFound {
                region_name: region_name.to_string(),
            })
    }

    /// Resolve region then realm.
    pub fn realm(&self, region_name: &str, realm_slug: &str) -> Result<Realm, LookupError> {
        let status = self.status(region_name)?;
        status
            .realm(realm_slug)
            .cloned()
            .ok_or_else(|| LookupError::RealmNotFound {
                region_name: region_name.to_string(),
                realm_slug: realm_slug.to_string(),
            })
    }

    /// Swap in a new status map. Its keys must be exactly the known regions.
    pub fn replace_statuses(&self, statuses: Statuses) -> Result<(), StateError> {
        let known: HashSet<&str> = self.regions.iter().map(|r| r.name.as_str()).collect();
        if let Some(unknown) = statuses.keys().find(|name| !known.contains(name.as_str())) {
            return Err(StateError::UnknownRegion(unknown.clone()));
        }
        if let Some(missing) = self.regions.iter().find(|r| !statuses.contains_key(&r.name)) {
            return Err(StateError::MissingRegion(missing.name.clone()));
        }

        *self.statuses.write() = Arc::new(statuses);
        Ok(())
    }

    /// Re-fetch every region's status and swap the map on full success.
    pub async fn refresh_statuses(&self) -> Result<(), StateError> {
        let mut statuses = Statuses::with_capacity(self.regions.len());
        for region in &self.regions {
            let status = self
                .status_source
                .fetch_status(&region.name)
                .await
                .map_err(|source| StateError::Refresh {
                    region_name: region.name.clone(),
                    source,
                })?;
            if status.region.name != region.name {
                return Err(StateError::UnknownRegion(status.region.name));
            }
            statuses.insert(region.name.clone(), status);
        }
        self.replace_statuses(statuses)
    }
}
