use std::sync::{Arc, Mutex};

use serde::Serialize;
use url::Url;

use crate::error::CacheError;

use super::{
    config::CacheConfig,
    http::{Request, Response},
    network::Network,
    storage::CacheStorage,
};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum WorkerState {
    Parsed,
    Installing,
    Installed,
    Activating,
    Activated,
    /// Install failed; the platform retries with a fresh worker.
    Redundant,
}

/// Lifecycle controls the platform grants the worker.
pub trait WorkerHost: Send + Sync {
    /// Activate without waiting for old pages to close.
    fn skip_waiting(&self);

    /// Take control of already-open pages.
    fn claim_clients(&self);
}

#[derive(Debug)]
pub enum FetchOutcome {
    /// Not ours to handle; the platform fetches as usual.
    PassThrough,
    Network(Response),
    Cached(Response),
    /// Nothing matched offline; the cached document root instead.
    Shell(Response),
    Unavailable(CacheError),
}

impl FetchOutcome {
    pub fn response(&self) -> Option<&Response> {
        match self {
            FetchOutcome::Network(response)
            | FetchOutcome::Cached(response)
            | FetchOutcome::Shell(response) => Some(response),
            FetchOutcome::PassThrough | FetchOutcome::Unavailable(_) => None,
        }
    }
}

/// Network-first read-through cache for the app shell.
pub struct OfflineCache {
    origin: Url,
    config: CacheConfig,
    network: Arc<dyn Network>,
    storage: Arc<dyn CacheStorage>,
    host: Arc<dyn WorkerHost>,
    state: Mutex<WorkerState>,
}

impl OfflineCache {
    pub fn new(
        origin: Url,
        config: CacheConfig,
        network: Arc<dyn Network>,
        storage: Arc<dyn CacheStorage>,
        host: Arc<dyn WorkerHost>,
    ) -> Self {
        Self {
            origin,
            config,
            network,
            storage,
            host,
            state: Mutex::new(WorkerState::Parsed),
        }
    }

    pub fn state(&self) -> WorkerState {
        *self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn set_state(&self, state: WorkerState) {
        *self.state.lock().unwrap_or_else(|p| p.into_inner()) = state;
    }

    pub fn generation(&self) -> &str {
        &self.config.generation
    }

    fn resolve(&self, path: &str) -> Result<Request, CacheError> {
        let url = self
            .origin
            .join(path)
            .map_err(|err| CacheError::InvalidRequest {
                url: path.to_string(),
                reason: err.to_string(),
            })?;
        Ok(Request::get(url))
    }

    pub fn shell_requests(&self) -> Result<Vec<Request>, CacheError> {
        self.config
            .app_shell
            .iter()
            .map(|path| self.resolve(path))
            .collect()
    }

    /// Fetch and store the whole app shell under the current generation.
    ///
    /// Any asset failing to arrive fails the install and stores nothing.
    pub async fn install(&self) -> Result<(), CacheError> {
        self.set_state(WorkerState::Installing);
        self.host.skip_waiting();

        match self.precache_shell().await {
            Ok(count) => {
                log_info!("installed {} shell assets into {}", count, self.config.generation);
                self.set_state(WorkerState::Installed);
                Ok(())
            }
            Err(err) => {
                log_warn!("install of {} failed: {}", self.config.generation, err);
                self.set_state(WorkerState::Redundant);
                Err(err)
            }
        }
    }

    async fn precache_shell(&self) -> Result<usize, CacheError> {
        let mut entries = Vec::new();
        for request in self.shell_requests()? {
            let response = self.network.fetch(&request).await?;
            if !response.ok() {
                return Err(CacheError::network(format!(
                    "{} answered {}",
                    request.url, response.status
                )));
            }
            entries.push((request, response));
        }

        let count = entries.len();
        self.storage
            .put_all(&self.config.generation, entries)
            .await?;
        Ok(count)
    }

    /// Purge every other generation and take control of open pages.
    pub async fn activate(&self) -> Result<(), CacheError> {
        self.set_state(WorkerState::Activating);
        let purged = self.purge_stale_generations().await;
        self.host.claim_clients();
        self.set_state(WorkerState::Activated);
        purged
    }

    async fn purge_stale_generations(&self) -> Result<(), CacheError> {
        for name in self.storage.keys().await? {
            if name == self.config.generation {
                continue;
            }
            self.storage.delete(&name).await?;
            log_info!("purged cache generation {}", name);
        }
        Ok(())
    }

    /// Same-origin http(s) GETs only.
    pub fn should_handle(&self, request: &Request) -> bool {
        request.is_get()
            && matches!(request.url.scheme(), "http" | "https")
            && request.url.origin() == self.origin.origin()
    }

    pub async fn handle_fetch(&self, request: &Request) -> FetchOutcome {
        if !self.should_handle(request) {
            return FetchOutcome::PassThrough;
        }

        match self.network.fetch(request).await {
            Ok(response) => {
                if response.is_cacheable() {
                    // Best effort; delivery never waits on a failed store.
                    if let Err(err) = self
                        .storage
                        .put(&self.config.generation, request, &response)
                        .await
                    {
                        log_debug!("could not cache {}: {}", request.url, err);
                    }
                }
                FetchOutcome::Network(response)
            }
            Err(err) => {
                log_debug!("network failed for {}: {}", request.url, err);
                self.fallback(request, err).await
            }
        }
    }

    async fn fallback(&self, request: &Request, network_err: CacheError) -> FetchOutcome {
        match self.storage.match_request(request).await {
            Ok(Some(response)) => return FetchOutcome::Cached(response),
            Ok(None) => {}
            Err(err) => log_warn!("cache lookup for {} failed: {}", request.url, err),
        }

        let root = match self.resolve(&self.config.root_path) {
            Ok(root) => root,
            Err(err) => return FetchOutcome::Unavailable(err),
        };
        match self.storage.match_request(&root).await {
            Ok(Some(response)) => FetchOutcome::Shell(response),
            Ok(None) => FetchOutcome::Unavailable(network_err),
            Err(err) => {
                log_warn!("cache lookup for {} failed: {}", root.url, err);
                FetchOutcome::Unavailable(network_err)
            }
        }
    }
}
