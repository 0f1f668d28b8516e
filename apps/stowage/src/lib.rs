//! # stowage
//!
//! Library half of the stowage binary: the HTTP API, the CLI and the
//! configuration loader, exposed for integration tests.

pub mod api;
pub mod cli;
pub mod config;
