//! Port traits.

pub mod outbound;
