//! Core types and shared functionality for squall.
//!
//! This crate provides:
//! - Versioned snapshot store with a SQLite backend
//! - Request model and document/asset classification
//! - Unified error types
//! - Configuration structures

pub mod config;
pub mod error;
pub mod request;
pub mod store;

pub use config::WorkerConfig;
pub use error::Error;
pub use request::{RequestClass, ResourceRequest};
pub use store::{RequestKey, ResponseSnapshot, StoreDb};
