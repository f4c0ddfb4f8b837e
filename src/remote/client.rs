// ABOUTME: HTTP client for the station data and region backfill endpoints
// ABOUTME: Handles conditional GETs, status checks and payload validation

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CACHE_CONTROL, ETAG, IF_NONE_MATCH};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::models::{AbortResponse, ProgressResponse, StartResponse, StationFetch};
use crate::backfill::BackfillApi;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::stations::{StationRecord, StationSource};

#[derive(Clone)]
pub struct RemoteClient {
    client: Client,
    base_url: String,
    stations_path: String,
    progress_path: String,
    start_path: String,
    abort_path: String,
}

impl RemoteClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ClientError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            stations_path: config.stations_path.clone(),
            progress_path: config.backfill.progress_path.clone(),
            start_path: config.backfill.start_path.clone(),
            abort_path: config.backfill.abort_path.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetches the station list, sending `etag` as `If-None-Match` when known.
    pub async fn get_stations(&self, etag: Option<&str>) -> Result<StationFetch, ClientError> {
        let url = self.url(&self.stations_path);

        let mut request = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .header(CACHE_CONTROL, "no-cache");
        if let Some(tag) = etag {
            request = request.header(IF_NONE_MATCH, tag);
        }

        let response = request.send().await.map_err(|e| {
            ClientError::Network(format!("Failed to fetch station data from {}: {}", url, e))
        })?;

        if response.status() == StatusCode::NOT_MODIFIED {
            debug!("Station data unchanged (304)");
            return Ok(StationFetch::NotModified);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::bad_status(status.as_u16(), body));
        }

        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.text().await?;
        let stations: Vec<StationRecord> = serde_json::from_str(&body).map_err(|e| {
            ClientError::malformed(format!("station payload is not a list of records: {}", e))
        })?;

        Ok(StationFetch::Modified { stations, etag })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.url(path);

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ClientError::Network(format!("Request to {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::bad_status(status.as_u16(), body));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn get_progress(&self) -> Result<ProgressResponse, ClientError> {
        self.get_json(&self.progress_path).await
    }

    pub async fn start_backfill(&self) -> Result<StartResponse, ClientError> {
        self.get_json(&self.start_path).await
    }

    pub async fn abort_backfill(&self) -> Result<AbortResponse, ClientError> {
        self.get_json(&self.abort_path).await
    }
}

#[async_trait]
impl StationSource for RemoteClient {
    async fn fetch_stations(&self, etag: Option<&str>) -> Result<StationFetch, ClientError> {
        self.get_stations(etag).await
    }
}

#[async_trait]
impl BackfillApi for RemoteClient {
    async fn progress(&self) -> Result<ProgressResponse, ClientError> {
        self.get_progress().await
    }

    async fn start(&self) -> Result<StartResponse, ClientError> {
        self.start_backfill().await
    }

    async fn abort(&self) -> Result<AbortResponse, ClientError> {
        self.abort_backfill().await
    }
}
