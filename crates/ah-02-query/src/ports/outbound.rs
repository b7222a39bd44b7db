//! # Outbound Ports (Driven Side)

use crate::domain::requests::{OwnersQueryByItemsRequest, OwnersQueryByItemsResponse};
use shared_types::DatabaseError;

/// The live-auctions Database Store.
pub trait LiveAuctionsStore: Send + Sync {
    /// Per-owner totals for the requested items in one realm's database.
    fn query_owners_by_items(
        &self,
        request: &OwnersQueryByItemsRequest,
    ) -> Result<OwnersQueryByItemsResponse, DatabaseError>;
}
