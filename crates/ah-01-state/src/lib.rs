//! # State Context (ah-01)
//!
//! Holds the regions, statuses and storage namespaces a process mode works
//! with. There is no global state: the context is built once and passed to
//! every handler registration.
//!
//! ## Startup Sequence
//!
//! ```text
//! topology ──→ regions ──→ status round trip per region ──→ provision
//!                           (sequential, fail-fast)          <databases>/<kind>/<region>/<realm>
//! ```
//!
//! Any failing step aborts startup; no partial state is ever served.
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Process modes, topology, errors
//! - `ports/` - Status source and namespace provisioner traits
//! - `adapters/` - Messenger, topology and filesystem implementations
//! - `service.rs` - The state context itself

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{
    namespace_path, FsNamespaceProvisioner, InMemoryNamespaceProvisioner, MessengerStatusSource,
    TopologyStatusSource,
};
pub use domain::errors::{ProvisionError, StartupError, StateError, StatusSourceError};
pub use domain::mode::{NamespaceKind, ProcessMode, UnknownMode};
pub use domain::topology::{RegionConfig, TopologyConfig};
pub use ports::outbound::{NamespaceProvisioner, StatusRequest, StatusSource};
pub use service::StateContext;
