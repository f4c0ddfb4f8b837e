// ABOUTME: Offline worker: versioned asset cache plus the fetch strategies
// ABOUTME: Install precaches, activate prunes old caches, handle serves requests

use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::routes::{AssetRequest, RouteRules, Strategy};
use crate::config::OfflineConfig;
use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResponse {
    pub status: u16,
    pub content_type: String,
    pub body: Vec<u8>,
    /// Same-origin response; cross-origin ones are never written by SWR.
    pub same_origin: bool,
}

impl AssetResponse {
    pub fn new(status: u16, content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type: content_type.to_string(),
            body: body.into(),
            same_origin: true,
        }
    }

    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn empty_json() -> Self {
        Self::new(200, "application/json", "[]")
    }

    fn error_page() -> Self {
        Self::new(
            200,
            "text/html",
            "<h1>Error</h1><p>The page could not be loaded.</p>",
        )
    }

    fn unavailable() -> Self {
        Self::new(503, "text/plain", "Offline")
    }
}

#[async_trait]
pub trait AssetFetcher: Send + Sync + 'static {
    /// `no_store` asks the network layer to skip any HTTP cache.
    async fn fetch(&self, path: &str, no_store: bool) -> Result<AssetResponse, ClientError>;
}

/// Named caches, each mapping a request path to a stored response.
#[derive(Debug, Default)]
pub struct CacheStore {
    caches: RwLock<HashMap<String, HashMap<String, AssetResponse>>>,
}

impl CacheStore {
    pub fn put(&self, cache: &str, path: &str, response: AssetResponse) {
        let mut caches = self.caches.write().unwrap_or_else(|e| e.into_inner());
        caches
            .entry(cache.to_string())
            .or_default()
            .insert(path.to_string(), response);
    }

    /// Looks `path` up in `preferred` first, then in every other cache.
    pub fn lookup(&self, preferred: &str, path: &str) -> Option<AssetResponse> {
        let caches = self.caches.read().unwrap_or_else(|e| e.into_inner());
        if let Some(hit) = caches.get(preferred).and_then(|c| c.get(path)) {
            return Some(hit.clone());
        }
        caches.values().find_map(|c| c.get(path).cloned())
    }

    pub fn names(&self) -> Vec<String> {
        let caches = self.caches.read().unwrap_or_else(|e| e.into_inner());
        let mut names: Vec<String> = caches.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn delete(&self, cache: &str) -> bool {
        let mut caches = self.caches.write().unwrap_or_else(|e| e.into_inner());
        caches.remove(cache).is_some()
    }
}

async fn with_timeout<T>(
    limit: Duration,
    fut: impl Future<Output = Result<T, ClientError>>,
) -> Result<T, ClientError> {
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| ClientError::Network("timeout".to_string()))?
}

pub struct OfflineWorker<F> {
    fetcher: Arc<F>,
    store: Arc<CacheStore>,
    rules: RouteRules,
    cache_name: String,
    offline_url: String,
    ping_url: String,
    precache: Vec<String>,
    navigation_timeout: Duration,
    ping_timeout: Duration,
}

impl<F: AssetFetcher> OfflineWorker<F> {
    pub fn new(fetcher: F, store: Arc<CacheStore>, config: &OfflineConfig) -> Self {
        let precache: BTreeSet<String> = config.precache_urls.iter().cloned().collect();
        Self {
            fetcher: Arc::new(fetcher),
            store,
            rules: RouteRules::new(config),
            cache_name: format!("{}-{}", config.cache_name, config.cache_version),
            offline_url: config.offline_url.clone(),
            ping_url: config.ping_url.clone(),
            precache: precache.into_iter().collect(),
            navigation_timeout: Duration::from_millis(config.navigation_timeout_ms),
            ping_timeout: Duration::from_millis(config.ping_timeout_ms),
        }
    }

    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    /// Sorted, de-duplicated precache list.
    pub fn precache_urls(&self) -> &[String] {
        &self.precache
    }

    /// Fetches every precache URL and stores them only if all succeeded.
    pub async fn install(&self) -> Result<usize, ClientError> {
        let mut fetched = Vec::with_capacity(self.precache.len());
        for path in &self.precache {
            let response = self.fetcher.fetch(path, false).await?;
            if !response.is_ok() {
                return Err(ClientError::bad_status(
                    response.status,
                    format!("precache of {} failed", path),
                ));
            }
            fetched.push((path, response));
        }
        for (path, response) in fetched {
            self.store.put(&self.cache_name, path, response);
        }
        info!("Precached {} assets into {}", self.precache.len(), self.cache_name);
        Ok(self.precache.len())
    }

    /// Deletes every cache except the current version; returns what was removed.
    pub fn activate(&self) -> Vec<String> {
        let stale: Vec<String> = self
            .store
            .names()
            .into_iter()
            .filter(|name| *name != self.cache_name)
            .collect();
        for name in &stale {
            self.store.delete(name);
            info!("Deleted outdated cache {}", name);
        }
        stale
    }

    /// Serves a request; `None` means the worker does not handle it.
    pub async fn handle(&self, request: &AssetRequest) -> Option<AssetResponse> {
        let strategy = self.rules.classify(request);
        debug!("{} {} -> {:?}", request.method, request.path, strategy);
        let response = match strategy {
            Strategy::Bypass => return None,
            Strategy::DataNetworkFirst => self.data_network_first(&request.path).await,
            Strategy::Navigation => self.navigation(&request.path).await,
            Strategy::NetworkOnly => self.network_only(&request.path).await,
            Strategy::StaleWhileRevalidate => self.stale_while_revalidate(&request.path).await,
        };
        Some(response)
    }

    fn cached(&self, path: &str) -> Option<AssetResponse> {
        self.store.lookup(&self.cache_name, path)
    }

    fn offline_page(&self) -> AssetResponse {
        self.cached(&self.offline_url)
            .unwrap_or_else(AssetResponse::unavailable)
    }

    async fn data_network_first(&self, path: &str) -> AssetResponse {
        match self.fetcher.fetch(path, true).await {
            Ok(resp) if resp.is_ok() => resp,
            Ok(resp) => self.cached(path).unwrap_or(resp),
            Err(e) => {
                warn!("Station data fetch failed: {}", e);
                self.cached(path).unwrap_or_else(AssetResponse::empty_json)
            }
        }
    }

    async fn navigation(&self, path: &str) -> AssetResponse {
        match with_timeout(self.navigation_timeout, self.fetcher.fetch(path, false)).await {
            Ok(resp) => {
                if resp.status == 200 {
                    self.store.put(&self.cache_name, path, resp.clone());
                }
                resp
            }
            Err(e) => {
                debug!("Navigation to {} failed: {}", path, e);
                if let Some(hit) = self.cached(path) {
                    return hit;
                }
                let ping = self.fetcher.fetch(&self.ping_url, true);
                match with_timeout(self.ping_timeout, ping).await {
                    // Online but the page failed: prefer the offline page, else a plain error.
                    Ok(resp) if resp.is_ok() => self
                        .cached(&self.offline_url)
                        .unwrap_or_else(AssetResponse::error_page),
                    _ => self.offline_page(),
                }
            }
        }
    }

    async fn network_only(&self, path: &str) -> AssetResponse {
        match self.fetcher.fetch(path, false).await {
            Ok(resp) => resp,
            Err(_) => self.offline_page(),
        }
    }

    async fn stale_while_revalidate(&self, path: &str) -> AssetResponse {
        if let Some(hit) = self.cached(path) {
            let fetcher = Arc::clone(&self.fetcher);
            let store = Arc::clone(&self.store);
            let cache_name = self.cache_name.clone();
            let path = path.to_string();
            tokio::spawn(async move {
                refresh(fetcher.as_ref(), &store, &cache_name, &path).await;
            });
            return hit;
        }
        match self.fetcher.fetch(path, false).await {
            Ok(resp) => {
                if resp.status == 200 && resp.same_origin {
                    self.store.put(&self.cache_name, path, resp.clone());
                }
                resp
            }
            Err(_) => self.offline_page(),
        }
    }

    /// Refreshes one cached asset from the network.
    pub async fn revalidate(&self, path: &str) {
        refresh(self.fetcher.as_ref(), &self.store, &self.cache_name, path).await;
    }
}

async fn refresh<F: AssetFetcher>(fetcher: &F, store: &CacheStore, cache_name: &str, path: &str) {
    match fetcher.fetch(path, false).await {
        Ok(resp) if resp.status == 200 && resp.same_origin => store.put(cache_name, path, resp),
        Ok(resp) => debug!("Not caching {} (status {})", path, resp.status),
        Err(e) => debug!("Revalidation of {} failed: {}", path, e),
    }
}
