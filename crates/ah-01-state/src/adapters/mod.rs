//! Adapters for the outbound ports.

pub mod namespace;
pub mod status;

pub use namespace::{namespace_path, FsNamespaceProvisioner, InMemoryNamespaceProvisioner};
pub use status::{MessengerStatusSource, TopologyStatusSource};
