//! # Query Dispatcher (ah-02)
//!
//! Answers request/reply queries over the messenger. Every subject follows
//! the same pattern, only the operation in the middle varies:
//!
//! ```text
//! request ──→ decode ──→ resolve region/realm ──→ execute ──→ encode ──→ reply
//!               │               │                    │           │
//!               ↓               ↓                    ↓           ↓
//!       MsgJSONParseError    NotFound        DatabaseCode → MessengerCode
//! ```
//!
//! Subjects form a closed set ([`QuerySubject`](shared_types::QuerySubject));
//! each is bound to its [`QueryOperation`] when the [`DispatchTable`] is built.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod ipc;
pub mod operations;
pub mod ports;

#[cfg(test)]
mod test_utils;

pub use adapters::InMemoryLiveAuctions;
pub use domain::auctions::{owners_by_items, Auction};
pub use domain::failure::QueryFailure;
pub use domain::requests::{
    ItemId, OwnerItemsOwnership, OwnerName, OwnersQueryByItemsRequest,
    OwnersQueryByItemsResponse, RealmModificationDatesRequest, RealmModificationDatesResponse,
};
pub use ipc::{subjects_for, Dispatch, DispatchTable, QueryDeps};
pub use operations::{
    OwnersQueryByItems, QueryOperation, RealmModificationDatesQuery, StatusQuery,
};
pub use ports::outbound::LiveAuctionsStore;
