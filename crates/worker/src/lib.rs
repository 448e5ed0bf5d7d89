//! The squall offline worker.
//!
//! A host-independent rendition of a service worker's caching logic: the
//! worker owns one versioned snapshot store and decides, per request,
//! whether to answer from the network, the store, or not at all. Hosts
//! drive it through three hooks mirroring the service worker lifecycle:
//!
//! - [`OfflineWorker::on_install`] precaches the configured app shell
//! - [`OfflineWorker::on_activate`] evicts stores from prior versions
//! - [`OfflineWorker::on_fetch`] serves a request, network-first for
//!   documents and cache-first for assets
//!
//! Decision logic never touches host types; any runtime that can hand over
//! method/URL/Accept triples can drive it.

pub mod lifecycle;
pub mod serve;
pub mod worker;

mod policy;

#[cfg(test)]
pub(crate) mod testing;

pub use lifecycle::WorkerState;
pub use serve::{FetchOutcome, ServeSource, ServedResponse};
pub use worker::{ActivationReport, OfflineWorker};
