//! Messenger-facing side of the query dispatcher.

pub mod dispatch;
pub mod table;

pub use dispatch::Dispatch;
pub use table::{subjects_for, DispatchTable, QueryDeps};
