//! The offline worker: lifecycle hooks and request dispatch.

use std::sync::Arc;

use squall_client::Fetch;
use squall_client::fetch::{canonicalize, resolve};
use squall_core::{Error, RequestClass, RequestKey, ResourceRequest, ResponseSnapshot, StoreDb, WorkerConfig};
use url::Url;

use crate::lifecycle::WorkerState;
use crate::serve::FetchOutcome;

/// What an activation evicted.
#[derive(Debug, Clone, Default)]
pub struct ActivationReport {
    /// Names of the stale stores that were deleted.
    pub evicted: Vec<String>,
}

/// Offline cache manager for one versioned store.
///
/// Construct it idle over an open [`StoreDb`], run [`on_install`] and
/// [`on_activate`], then share it (typically in an `Arc`) and route the
/// page's requests through [`on_fetch`].
///
/// [`on_install`]: OfflineWorker::on_install
/// [`on_activate`]: OfflineWorker::on_activate
/// [`on_fetch`]: OfflineWorker::on_fetch
pub struct OfflineWorker {
    pub(crate) config: WorkerConfig,
    pub(crate) store: StoreDb,
    pub(crate) fetcher: Arc<dyn Fetch>,
    pub(crate) cache_name: String,
    origin: Url,
    state: WorkerState,
}

impl OfflineWorker {
    /// Build an idle worker.
    ///
    /// The configured origin must parse as a URL; everything else was
    /// checked when the configuration loaded.
    pub fn new(config: WorkerConfig, store: StoreDb, fetcher: Arc<dyn Fetch>) -> Result<Self, Error> {
        let origin =
            Url::parse(&config.origin).map_err(|e| Error::InvalidUrl(format!("origin {}: {e}", config.origin)))?;
        let cache_name = config.cache_name();

        Ok(Self { config, store, fetcher, cache_name, origin, state: WorkerState::Idle })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Name of the store this worker considers current.
    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    /// Install: fetch the manifest and populate the current store.
    ///
    /// Every manifest entry is fetched up front and written in a single
    /// transaction. Any fetch failure, or any non-200 response, fails the
    /// whole install and leaves no partial store; the worker returns to
    /// idle so the host may retry.
    pub async fn on_install(&mut self) -> Result<(), Error> {
        if !self.state.can_install() {
            return Err(Error::Lifecycle { state: self.state.to_string(), event: "install".into() });
        }
        self.state = WorkerState::Installing;
        tracing::info!("installing {}: precaching {} manifest entries", self.cache_name, self.config.precache.len());

        match self.precache_manifest().await {
            Ok(count) => {
                self.state = WorkerState::Installed;
                tracing::info!("installed {} with {count} precached entries", self.cache_name);
                Ok(())
            }
            Err(err) => {
                self.state = WorkerState::Idle;
                tracing::error!("install of {} failed: {err}", self.cache_name);
                Err(err)
            }
        }
    }

    /// Fetch every manifest entry, then store the batch atomically.
    async fn precache_manifest(&self) -> Result<usize, Error> {
        let mut rows = Vec::with_capacity(self.config.precache.len());

        for path in &self.config.precache {
            let target =
                resolve(&self.origin, path).map_err(|e| Error::Install { url: path.clone(), reason: e.to_string() })?;
            let request = ResourceRequest::get(target.as_str(), None);

            let response = self
                .fetcher
                .fetch(&request)
                .await
                .map_err(|e| Error::Install { url: target.to_string(), reason: e.to_string() })?;
            if response.status != 200 {
                return Err(Error::Install {
                    url: target.to_string(),
                    reason: format!("status {}", response.status),
                });
            }

            let key = RequestKey::new("GET", target.as_str());
            rows.push((key, ResponseSnapshot::new(response.status, response.headers, response.body.to_vec())));
        }

        let count = rows.len();
        self.store.put_all(&self.cache_name, rows).await?;
        Ok(count)
    }

    /// Activate: delete every store whose name is not the current one.
    ///
    /// Eviction is best-effort; a failed enumeration or per-store delete is
    /// logged and skipped rather than blocking activation, so the worker
    /// always reaches `Active` once this runs.
    pub async fn on_activate(&mut self) -> Result<ActivationReport, Error> {
        if !self.state.can_activate() {
            return Err(Error::Lifecycle { state: self.state.to_string(), event: "activate".into() });
        }
        self.state = WorkerState::Activating;
        tracing::info!("activating {}", self.cache_name);

        let mut report = ActivationReport::default();
        match self.store.store_names().await {
            Ok(names) => {
                for name in names {
                    if name == self.cache_name {
                        continue;
                    }
                    match self.store.delete_store(&name).await {
                        Ok(true) => {
                            tracing::info!("evicted stale store {name}");
                            report.evicted.push(name);
                        }
                        Ok(false) => {}
                        Err(err) => tracing::warn!("failed to evict stale store {name}: {err}"),
                    }
                }
            }
            Err(err) => tracing::warn!("could not enumerate stores for eviction: {err}"),
        }

        self.state = WorkerState::Active;
        tracing::info!("{} active", self.cache_name);
        Ok(report)
    }

    /// Serve one request.
    ///
    /// Only GET requests reaching an active worker are handled; everything
    /// else comes back [`FetchOutcome::Unhandled`] so the host performs its
    /// own fetch. Handled requests are classified and served network-first
    /// (documents) or cache-first (assets).
    pub async fn on_fetch(&self, request: &ResourceRequest) -> Result<FetchOutcome, Error> {
        if self.state != WorkerState::Active {
            tracing::debug!("not active; leaving {} to the host", request.url);
            return Ok(FetchOutcome::Unhandled);
        }
        if !request.is_get() {
            tracing::debug!("{} {} left to the host", request.method, request.url);
            return Ok(FetchOutcome::Unhandled);
        }

        let url = canonicalize(&request.url).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        if self.is_passthrough(&url) {
            tracing::debug!("passthrough host; leaving {} to the host", request.url);
            return Ok(FetchOutcome::Unhandled);
        }

        // Method is pinned to GET so a lowercase spelling maps to the same
        // entry install wrote.
        let canonical =
            ResourceRequest { method: "GET".to_string(), url: url.to_string(), accept: request.accept.clone() };
        let key = RequestKey::new("GET", url.as_str());

        let served = match canonical.class() {
            RequestClass::Document => self.network_first(&canonical, &key).await?,
            RequestClass::Asset => self.cache_first(&canonical, &key).await?,
        };
        Ok(FetchOutcome::Served(served))
    }

    /// Whether a URL's host is excluded from interception.
    fn is_passthrough(&self, url: &Url) -> bool {
        match url.host_str() {
            Some(host) => self.config.passthrough_hosts.iter().any(|h| h.eq_ignore_ascii_case(host)),
            None => false,
        }
    }
}
