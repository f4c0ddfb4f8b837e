// ABOUTME: Per-route caching rules of the offline worker
// ABOUTME: Maps a request to exactly one strategy; no general rule engine

use crate::config::OfflineConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequest {
    pub method: String,
    pub path: String,
    /// Top-level page navigation rather than a subresource fetch.
    pub navigate: bool,
}

impl AssetRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: "GET".to_string(),
            path: path.into(),
            navigate: false,
        }
    }

    pub fn navigate(path: impl Into<String>) -> Self {
        Self {
            navigate: true,
            ..Self::get(path)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Not handled by the worker at all (non-GET).
    Bypass,
    /// Station data: network with `no-store`, never written to the cache.
    DataNetworkFirst,
    /// Network with timeout, then cached page, then offline page.
    Navigation,
    /// API-like endpoints: network, offline page when unreachable.
    NetworkOnly,
    StaleWhileRevalidate,
}

#[derive(Debug, Clone)]
pub struct RouteRules {
    data_prefix: String,
    skip_prefixes: Vec<String>,
}

impl RouteRules {
    pub fn new(config: &OfflineConfig) -> Self {
        Self {
            data_prefix: config.data_prefix.clone(),
            skip_prefixes: config.skip_prefixes.clone(),
        }
    }

    fn is_skipped(&self, path: &str) -> bool {
        path.starts_with(&self.data_prefix)
            || self.skip_prefixes.iter().any(|p| path.starts_with(p.as_str()))
    }

    pub fn classify(&self, request: &AssetRequest) -> Strategy {
        if !request.method.eq_ignore_ascii_case("GET") {
            return Strategy::Bypass;
        }
        if request.path.starts_with(&self.data_prefix) {
            return Strategy::DataNetworkFirst;
        }
        if request.navigate {
            return Strategy::Navigation;
        }
        if self.is_skipped(&request.path) {
            return Strategy::NetworkOnly;
        }
        Strategy::StaleWhileRevalidate
    }
}
