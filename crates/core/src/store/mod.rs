//! SQLite-backed versioned stores for response snapshots.
//!
//! One database holds any number of named stores. Exactly one (named after
//! the configured cache prefix and version) serves requests; the rest are
//! stale generations awaiting eviction. Supports:
//!
//! - Request-addressed snapshots keyed by SHA-256 of method plus URL
//! - Atomic batch population for the install-time manifest
//! - Automatic schema migrations
//! - WAL mode for concurrent access

pub mod connection;
pub mod entries;
pub mod key;
pub mod migrations;

pub use crate::Error;
pub use connection::StoreDb;
pub use entries::ResponseSnapshot;
pub use key::RequestKey;
