//! Domain layer.

pub mod config;
pub mod errors;
pub mod report;
