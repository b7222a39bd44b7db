//! Request and response bodies for the query subjects.

use serde::{Deserialize, Serialize};
use shared_types::{RealmModificationDates, RealmSlug, RegionName};
use std::collections::BTreeMap;

/// Game item identifier.
pub type ItemId = u64;

/// Auction owner name.
pub type OwnerName = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnersQueryByItemsRequest {
    pub region_name: RegionName,
    pub realm_slug: RealmSlug,
    pub item_ids: Vec<ItemId>,
}

/// What one owner holds of the queried items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OwnerItemsOwnership {
    /// Sum of buyout times quantity.
    pub owned_value: u64,
    /// Sum of quantities.
    pub owned_volume: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OwnersQueryByItemsResponse {
    pub total_value: u64,
    pub total_volume: u64,
    pub ownership: BTreeMap<OwnerName, OwnerItemsOwnership>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealmModificationDatesRequest {
    pub region_name: RegionName,
    pub realm_slug: RealmSlug,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealmModificationDatesResponse {
    pub modification_dates: RealmModificationDates,
}
