//! # Gateway Invoker (ah-04)
//!
//! Bridges the `callComputeAllPricelistHistories` bus topic to the remote
//! compute gateway.
//!
//! A trigger is decoded, acknowledged with an empty envelope, and only then
//! queued for the remote call. The requester never waits on the gateway and
//! never learns how the call went; failures are logged and counted.
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Errors
//! - `ports/` - Remote gateway trait
//! - `adapters/` - HTTP gateway client
//! - `ipc/` - Trigger listener and call worker

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod ipc;
pub mod ports;

#[cfg(test)]
mod test_utils;

pub use adapters::{HttpRemoteGateway, COMPUTE_ALL_PRICELIST_HISTORIES_PATH};
pub use domain::errors::GatewayError;
pub use ipc::{listen_for_compute, DEFAULT_QUEUE_CAPACITY};
pub use ports::outbound::RemoteGateway;
