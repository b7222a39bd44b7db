//! Bus-facing side of the monitor.

pub mod listener;

pub use listener::listen_for_sync;
