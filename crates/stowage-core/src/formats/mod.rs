//! # Formats
//!
//! Byte-level encodings. File and database I/O live in [`crate::storage`].

pub mod persistence;

pub use persistence::{PersistenceHeader, character_from_bytes, character_to_bytes};
