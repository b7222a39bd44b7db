//! Adapters for the outbound ports.

pub mod live_auctions;

pub use live_auctions::InMemoryLiveAuctions;
