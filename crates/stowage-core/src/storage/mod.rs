//! # Storage
//!
//! Persistent roster backends.

pub mod redb_roster;

pub use redb_roster::{RedbConditions, RedbRoster};
