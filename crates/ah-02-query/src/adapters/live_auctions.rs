//! In-memory live-auctions store.

use crate::domain::auctions::{owners_by_items, Auction};
use crate::domain::requests::{OwnersQueryByItemsRequest, OwnersQueryByItemsResponse};
use crate::ports::outbound::LiveAuctionsStore;
use parking_lot::RwLock;
use shared_types::{DatabaseError, RealmSlug, RegionName};
use std::collections::HashMap;

/// Auction lists per (region, realm). A realm with nothing loaded has no
/// database.
#[derive(Debug, Default)]
pub struct InMemoryLiveAuctions {
    databases: RwLock<HashMap<(RegionName, RealmSlug), Vec<Auction>>>,
}

impl InMemoryLiveAuctions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace one realm's auctions.
    pub fn load(&self, region_name: &str, realm_slug: &str, auctions: Vec<Auction>) {
        self.databases
            .write()
            .insert((region_name.to_string(), realm_slug.to_string()), auctions);
    }

    #[must_use]
    pub fn auction_count(&self, region_name: &str, realm_slug: &str) -> usize {
        self.databases
            .read()
            .get(&(region_name.to_string(), realm_slug.to_string()))
            .map_or(0, Vec::len)
    }
}

impl LiveAuctionsStore for InMemoryLiveAuctions {
    fn query_owners_by_items(
        &self,
        request: &OwnersQueryByItemsRequest,
    ) -> Result<OwnersQueryByItemsResponse, DatabaseError> {
        let databases = self.databases.read();
        let key = (request.region_name.clone(), request.realm_slug.clone());
        let auctions = databases.get(&key).ok_or_else(|| {
            DatabaseError::not_found(format!(
                "no live-auctions database for {}/{}",
                request.region_name, request.realm_slug
            ))
        })?;
        Ok(owners_by_items(auctions, &request.item_ids))
    }
}
