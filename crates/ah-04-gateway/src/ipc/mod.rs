//! Bus-facing side of the gateway invoker.

pub mod listener;

pub use listener::{listen_for_compute, DEFAULT_QUEUE_CAPACITY};
