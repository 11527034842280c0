//! taiga-cli - command-line reporting client for Taiga.
//!
//! This library holds the core of the tool: the persisted configuration
//! and session-token stores, the session manager, the remote query
//! facade over the Taiga REST API, the implicit-context resolver, and
//! the aggregation engine behind the text reports.

#![deny(missing_docs)]

/// Version string from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod api;
pub mod cli;
pub mod config;
pub mod context;
pub mod session;
pub mod stats;
