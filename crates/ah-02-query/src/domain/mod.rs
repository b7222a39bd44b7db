//! Domain layer: query bodies, auctions and failures.

pub mod auctions;
pub mod failure;
pub mod requests;
