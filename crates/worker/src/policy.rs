//! The two caching strategies.
//!
//! Documents are network-first: the live response wins and the store
//! catches the offline case. Assets are cache-first: a stored snapshot
//! wins and the network fills misses. Store writes happen off the request
//! path in spawned tasks whose failures are logged, never surfaced.

use squall_client::FetchedResponse;
use squall_core::{Error, RequestKey, ResourceRequest, ResponseSnapshot};

use crate::serve::ServedResponse;
use crate::worker::OfflineWorker;

impl OfflineWorker {
    /// Network-first: live response, store fallback when the network fails.
    pub(crate) async fn network_first(
        &self,
        request: &ResourceRequest,
        key: &RequestKey,
    ) -> Result<ServedResponse, Error> {
        match self.fetcher.fetch(request).await {
            Ok(response) => {
                // Snapshot whatever the network said, error statuses
                // included; offline mode replays exactly what the page saw.
                self.spawn_store_write(key.clone(), snapshot_of(&response));
                Ok(ServedResponse::from_network(response))
            }
            Err(err) => {
                tracing::warn!("network-first fetch failed for {}: {err}; trying store", request.url);
                match self.store.lookup(&self.cache_name, key).await {
                    Ok(Some(snapshot)) => {
                        tracing::debug!("serving {} from store", request.url);
                        Ok(ServedResponse::from_store(snapshot))
                    }
                    Ok(None) => Err(err),
                    Err(store_err) => {
                        tracing::warn!("store lookup failed for {}: {store_err}", request.url);
                        Err(err)
                    }
                }
            }
        }
    }

    /// Cache-first: stored snapshot, network on miss. Only 200 responses
    /// earn a place in the store.
    pub(crate) async fn cache_first(
        &self,
        request: &ResourceRequest,
        key: &RequestKey,
    ) -> Result<ServedResponse, Error> {
        match self.store.lookup(&self.cache_name, key).await {
            Ok(Some(snapshot)) => {
                tracing::debug!("serving {} from store", request.url);
                return Ok(ServedResponse::from_store(snapshot));
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!("store lookup failed for {}: {err}; going to network", request.url);
            }
        }

        let response = self.fetcher.fetch(request).await?;
        if response.status == 200 {
            self.spawn_store_write(key.clone(), snapshot_of(&response));
        } else {
            tracing::debug!("not caching {} response for {}", response.status, request.url);
        }
        Ok(ServedResponse::from_network(response))
    }

    /// Write a snapshot off the request path.
    ///
    /// The response this snapshot came from has already been handed out, so
    /// a failed write only costs a future cache hit; it is logged and
    /// swallowed.
    pub(crate) fn spawn_store_write(&self, key: RequestKey, snapshot: ResponseSnapshot) {
        let store = self.store.clone();
        let name = self.cache_name.clone();
        tokio::spawn(async move {
            if let Err(err) = store.put(&name, &key, &snapshot).await {
                tracing::warn!("background store write failed for {} {}: {err}", key.method, key.url);
            }
        });
    }
}

/// Capture a network response as a store snapshot.
fn snapshot_of(response: &FetchedResponse) -> ResponseSnapshot {
    ResponseSnapshot::new(response.status, response.headers.clone(), response.body.to_vec())
}
