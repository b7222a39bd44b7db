//! Adapters for the outbound ports.

pub mod clock;
pub mod registry;

pub use clock::{ManualClock, SystemTimeSource};
pub use registry::{InMemoryTopicRegistry, JsonFileTopicRegistry};
