// ABOUTME: Offline support module
// ABOUTME: Route rules and the cache-backed worker that applies them

pub mod routes;
pub mod worker;

pub use routes::{AssetRequest, RouteRules, Strategy};
pub use worker::{AssetFetcher, AssetResponse, CacheStore, OfflineWorker};
