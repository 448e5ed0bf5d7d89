//! Network client for squall.
//!
//! This crate provides the fetch seam between the offline worker and the
//! outside world: a host-independent [`Fetch`] trait plus the reqwest-backed
//! implementation used in production.

pub mod fetch;

pub use fetch::{Fetch, FetchConfig, FetchedResponse, HttpFetcher};
