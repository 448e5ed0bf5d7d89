//! Test doubles and helpers shared by the worker's test modules.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use squall_client::{Fetch, FetchedResponse};
use squall_core::{Error, RequestKey, ResourceRequest, StoreDb, WorkerConfig};

/// Origin every test worker is configured with.
pub const ORIGIN: &str = "https://app.example";

/// Config for `ORIGIN` with an empty manifest; tests override what they need.
pub fn test_config(version: &str) -> WorkerConfig {
    WorkerConfig { version: version.into(), origin: ORIGIN.into(), ..Default::default() }
}

/// Route test logs through tracing, RUST_LOG controlled.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Poll the store until the entry for `key` holds `body`.
///
/// Store writes are spawned off the request path, so tests observe them
/// eventually rather than immediately.
pub async fn wait_for_entry(store: &StoreDb, name: &str, key: &RequestKey, body: &[u8]) -> bool {
    for _ in 0..100 {
        if let Ok(Some(snapshot)) = store.lookup(name, key).await
            && snapshot.body == body
        {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    false
}

#[derive(Clone)]
enum Scripted {
    Respond { status: u16, content_type: &'static str, body: &'static str },
    NetworkDown,
    TimedOut,
}

/// Scripted stand-in for the network.
///
/// Every URL resolves to a canned outcome, and hits are counted so tests
/// can assert a request never left the worker. Unscripted URLs behave like
/// an unreachable network.
#[derive(Default)]
pub struct ScriptedFetch {
    script: Mutex<HashMap<String, Scripted>>,
    hits: Mutex<HashMap<String, usize>>,
}

impl ScriptedFetch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a response. Re-scripting a URL replaces the previous outcome.
    pub fn ok(&self, url: &str, status: u16, content_type: &'static str, body: &'static str) {
        self.script.lock().unwrap().insert(url.to_string(), Scripted::Respond { status, content_type, body });
    }

    /// Script a network failure.
    pub fn down(&self, url: &str) {
        self.script.lock().unwrap().insert(url.to_string(), Scripted::NetworkDown);
    }

    /// Script a timeout.
    pub fn timeout(&self, url: &str) {
        self.script.lock().unwrap().insert(url.to_string(), Scripted::TimedOut);
    }

    /// How many times a URL was fetched.
    pub fn hits(&self, url: &str) -> usize {
        self.hits.lock().unwrap().get(url).copied().unwrap_or(0)
    }
}

#[async_trait]
impl Fetch for ScriptedFetch {
    async fn fetch(&self, request: &ResourceRequest) -> Result<FetchedResponse, Error> {
        *self.hits.lock().unwrap().entry(request.url.clone()).or_insert(0) += 1;

        let scripted = self.script.lock().unwrap().get(&request.url).cloned();
        match scripted {
            Some(Scripted::Respond { status, content_type, body }) => Ok(FetchedResponse {
                url: request.url.clone(),
                final_url: request.url.clone(),
                status,
                headers: vec![("content-type".to_string(), content_type.to_string())],
                body: Bytes::from_static(body.as_bytes()),
                fetch_ms: 1,
            }),
            Some(Scripted::NetworkDown) => Err(Error::NetworkUnavailable(format!("scripted outage for {}", request.url))),
            Some(Scripted::TimedOut) => Err(Error::Timeout(format!("scripted timeout for {}", request.url))),
            None => Err(Error::NetworkUnavailable(format!("unscripted url {}", request.url))),
        }
    }
}
