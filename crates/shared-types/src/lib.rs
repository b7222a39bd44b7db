//! # Shared Types Crate
//!
//! This crate contains the data model, the two-tier result code schemes and
//! the subject/topic identifiers shared by every subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Two-Tier Codes**: Storage reports a [`DatabaseCode`], the wire carries a
//!   [`MessengerCode`]. The two are joined by one fixed, total table.
//! - **Stable Identifiers**: Subject and topic names are wire contracts shared
//!   with other processes; they never change without a coordinated redeploy.

pub mod codes;
pub mod entities;
pub mod errors;
pub mod subjects;
pub mod topics;

pub use codes::{BusCode, DatabaseCode, MessengerCode};
pub use entities::*;
pub use errors::*;
pub use subjects::{BusTopic, QuerySubject};
pub use topics::{TopicRecord, TopicRecords};
