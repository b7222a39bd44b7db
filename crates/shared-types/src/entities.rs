//! # Core Domain Entities
//!
//! Regions, realms and the per-region status snapshot, plus the
//! region/realm/timestamp tuple used by compute fan-out requests.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unique key of a region.
pub type RegionName = String;

/// Realm identifier, unique within its region.
pub type RealmSlug = String;

/// Unix timestamp in seconds.
pub type UnixTimestamp = i64;

/// A top-level geographic grouping of realms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub name: RegionName,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub primary: bool,
}

impl Region {
    pub fn new(name: impl Into<RegionName>) -> Self {
        Self {
            name: name.into(),
            hostname: String::new(),
            primary: false,
        }
    }
}

/// Modification markers tracked for every realm.
///
/// A zero value means the event has not happened yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RealmModificationDates {
    pub downloaded: UnixTimestamp,
    pub live_auctions_received: UnixTimestamp,
    pub pricelist_histories_received: UnixTimestamp,
}

/// A named shard within a region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Realm {
    pub slug: RealmSlug,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub modification_dates: RealmModificationDates,
}

impl Realm {
    pub fn new(slug: impl Into<RealmSlug>) -> Self {
        let slug = slug.into();
        Self {
            name: slug.clone(),
            slug,
            modification_dates: RealmModificationDates::default(),
        }
    }

    #[must_use]
    pub fn with_modification_dates(mut self, dates: RealmModificationDates) -> Self {
        self.modification_dates = dates;
        self
    }
}

/// A region's realm snapshot as last refreshed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub region: Region,
    pub realms: Vec<Realm>,
}

impl Status {
    /// Find a realm by slug.
    pub fn realm(&self, slug: &str) -> Option<&Realm> {
        self.realms.iter().find(|realm| realm.slug == slug)
    }
}

/// One status per region, keyed by region name.
pub type Statuses = HashMap<RegionName, Status>;

/// Unit of work for compute-all style fan-out requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRealmTimestampTuple {
    pub region_name: RegionName,
    pub realm_slug: RealmSlug,
    pub target_timestamp: UnixTimestamp,
}

/// Ordered collection of tuples. Duplicates are permitted and consumers must
/// not depend on the order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionRealmTimestampTuples(pub Vec<RegionRealmTimestampTuple>);

impl RegionRealmTimestampTuples {
    /// Decode from a JSON payload.
    pub fn decode(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }

    /// Encode to a JSON payload.
    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<RegionRealmTimestampTuple> for RegionRealmTimestampTuples {
    fn from_iter<I: IntoIterator<Item = RegionRealmTimestampTuple>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuple(region: &str, realm: &str, ts: i64) -> RegionRealmTimestampTuple {
        RegionRealmTimestampTuple {
            region_name: region.to_string(),
            realm_slug: realm.to_string(),
            target_timestamp: ts,
        }
    }

    #[test]
    fn test_status_realm_lookup() {
        let status = Status {
            region: Region::new("us"),
            realms: vec![Realm::new("earthen-ring"), Realm::new("tichondrius")],
        };
        assert!(status.realm("tichondrius").is_some());
        assert!(status.realm("stormrage").is_none());
    }

    #[test]
    fn test_tuples_decode_keeps_duplicates() {
        let tuples: RegionRealmTimestampTuples =
            vec![tuple("us", "a", 10), tuple("us", "a", 10)].into_iter().collect();
        let encoded = tuples.encode().unwrap();

        let decoded = RegionRealmTimestampTuples::decode(&encoded).unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded, tuples);
    }

    #[test]
    fn test_tuples_decode_rejects_garbage() {
        assert!(RegionRealmTimestampTuples::decode(b"{not json").is_err());
        assert!(RegionRealmTimestampTuples::decode(b"{\"region_name\":\"us\"}").is_err());
    }

    #[test]
    fn test_realm_defaults_from_slug() {
        let realm = Realm::new("earthen-ring");
        assert_eq!(realm.name, "earthen-ring");
        assert_eq!(realm.modification_dates, RealmModificationDates::default());
    }
}
