//! Adapters for the outbound ports.

pub mod http;

pub use http::{HttpRemoteGateway, COMPUTE_ALL_PRICELIST_HISTORIES_PATH};
