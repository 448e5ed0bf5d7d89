//! What `on_fetch` hands back to the host.

use bytes::Bytes;
use squall_client::FetchedResponse;
use squall_core::ResponseSnapshot;

/// Outcome of asking the worker to handle a request.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// The worker produced a response, from network or store.
    Served(ServedResponse),
    /// The worker declines and the host performs its default fetch.
    /// Returned for non-GET methods, passthrough hosts, and any request
    /// arriving before activation.
    Unhandled,
}

impl FetchOutcome {
    /// The served response, if any.
    pub fn response(&self) -> Option<&ServedResponse> {
        match self {
            FetchOutcome::Served(response) => Some(response),
            FetchOutcome::Unhandled => None,
        }
    }
}

/// Where a served response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeSource {
    /// Live from the network.
    Network,
    /// Replayed from the snapshot store.
    Store,
}

/// A response the worker can hand to the page.
#[derive(Debug, Clone)]
pub struct ServedResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
    pub source: ServeSource,
}

impl ServedResponse {
    /// Wrap a live network response.
    pub fn from_network(response: FetchedResponse) -> Self {
        Self {
            status: response.status,
            headers: response.headers,
            body: response.body,
            source: ServeSource::Network,
        }
    }

    /// Replay a stored snapshot.
    pub fn from_store(snapshot: ResponseSnapshot) -> Self {
        Self {
            status: snapshot.status,
            headers: snapshot.headers,
            body: Bytes::from(snapshot.body),
            source: ServeSource::Store,
        }
    }
}
