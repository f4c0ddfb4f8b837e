// ABOUTME: Headless client for the Wildvogelhilfe station map and admin pages
// ABOUTME: Station loading, map rendering, search, geolocation, backfill polling and offline caching

pub mod admin;
pub mod backfill;
pub mod config;
pub mod context;
pub mod error;
pub mod geo;
pub mod geolocation;
pub mod logging;
pub mod map;
pub mod offline;
pub mod remote;
pub mod search;
pub mod stations;
pub mod ui;
pub mod widget;

pub use config::ClientConfig;
pub use context::AppContext;
pub use error::ClientError;
pub use remote::RemoteClient;
