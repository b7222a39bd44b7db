//! Domain layer: process roles, bootstrap topology and errors.

pub mod errors;
pub mod mode;
pub mod topology;
