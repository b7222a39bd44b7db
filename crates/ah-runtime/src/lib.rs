//! # Auction House Runtime
//!
//! One binary, several process modes. The mode decides which state context is
//! built and which listeners are started:
//!
//! | Mode | Serves |
//! |------|--------|
//! | `api` | `status`, `queryRealmModificationDates` |
//! | `live-auctions` | `ownersQueryByItems` |
//! | `pricelist-histories` | state only |
//! | `pubsub-topics-monitor` | `syncPubsubTopicsMonitor` trigger |
//! | `gateway` | `callComputeAllPricelistHistories` trigger |
//! | `standalone` | all of the above |
//!
//! ## Modular Structure
//!
//! - `config` - Environment and argument loading
//! - `transport` - Messenger and bus connections
//! - `runtime` - Startup wiring and graceful shutdown

pub mod config;
pub mod runtime;
pub mod transport;

pub use config::{ConfigError, MessengerConfig, RuntimeConfig, IN_PROCESS_HOST, TOPIC_REGISTRY_FILE};
pub use runtime::{AuctionHouseRuntime, RuntimeError};
pub use transport::{connect, Transport};
