//! Live auction records and the owners-by-items aggregation over them.

use crate::domain::requests::{
    ItemId, OwnerItemsOwnership, OwnerName, OwnersQueryByItemsResponse,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One live auction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auction {
    pub id: u64,
    pub item_id: ItemId,
    pub owner: OwnerName,
    /// Per-unit buyout.
    pub buyout: u64,
    pub quantity: u64,
}

/// Per-owner totals over the auctions for `item_ids`.
#[must_use]
pub fn owners_by_items(auctions: &[Auction], item_ids: &[ItemId]) -> OwnersQueryByItemsResponse {
    let wanted: HashSet<ItemId> = item_ids.iter().copied().collect();
    let mut response = OwnersQueryByItemsResponse::default();

    for auction in auctions.iter().filter(|a| wanted.contains(&a.item_id)) {
        let value = auction.buyout.saturating_mul(auction.quantity);
        let entry = response
            .ownership
            .entry(auction.owner.clone())
            .or_insert_with(OwnerItemsOwnership::default);
        entry.owned_value = entry.owned_value.saturating_add(value);
        entry.owned_volume = entry.owned_volume.saturating_add(auction.quantity);
        response.total_value = response.total_value.saturating_add(value);
        response.total_volume = response.total_volume.saturating_add(auction.quantity);
    }

    response
}
