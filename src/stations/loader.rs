// ABOUTME: Holds the read-only station snapshot and refreshes it wholesale
// ABOUTME: A 304 keeps the previous snapshot untouched; failures never clear it

use async_trait::async_trait;
use tracing::{error, info};

use super::record::StationRecord;
use crate::error::ClientError;
use crate::remote::StationFetch;

/// Anything that can deliver the station list with conditional GET support.
#[async_trait]
pub trait StationSource: Send + Sync {
    async fn fetch_stations(&self, etag: Option<&str>) -> Result<StationFetch, ClientError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Replaced { count: usize },
    Unchanged,
}

pub const LOAD_FAILURE_MESSAGE: &str =
    "Station data could not be loaded. Please try again later.";

pub struct StationDataLoader<S> {
    source: S,
    snapshot: Vec<StationRecord>,
    etag: Option<String>,
}

impl<S: StationSource> StationDataLoader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            snapshot: Vec::new(),
            etag: None,
        }
    }

    pub async fn load(&mut self) -> Result<LoadOutcome, ClientError> {
        match self.source.fetch_stations(self.etag.as_deref()).await {
            Ok(StationFetch::NotModified) => {
                info!(
                    "Station data unchanged (304), keeping {} stations",
                    self.snapshot.len()
                );
                Ok(LoadOutcome::Unchanged)
            }
            Ok(StationFetch::Modified { stations, etag }) => {
                let count = stations.len();
                self.snapshot = stations;
                self.etag = etag;
                info!("Loaded {} stations", count);
                Ok(LoadOutcome::Replaced { count })
            }
            Err(e) => {
                error!("Failed to load stations: {}", e);
                Err(e)
            }
        }
    }

    pub fn stations(&self) -> &[StationRecord] {
        &self.snapshot
    }

    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct ScriptedSource {
        responses: Mutex<VecDeque<Result<StationFetch, ClientError>>>,
        seen_etags: Mutex<Vec<Option<String>>>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<Result<StationFetch, ClientError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                seen_etags: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl StationSource for ScriptedSource {
        async fn fetch_stations(&self, etag: Option<&str>) -> Result<StationFetch, ClientError> {
            self.seen_etags.lock().unwrap().push(etag.map(str::to_string));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted response left")
        }
    }

    fn station(name: &str, lat: f64, lng: f64) -> StationRecord {
        StationRecord {
            name: name.to_string(),
            latitude: json!(lat),
            longitude: json!(lng),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_not_modified_keeps_snapshot() {
        let first = vec![station("A", 52.5, 13.4), station("B", 48.1, 11.6)];
        let source = ScriptedSource::new(vec![
            Ok(StationFetch::Modified {
                stations: first.clone(),
                etag: Some("\"v1\"".to_string()),
            }),
            Ok(StationFetch::NotModified),
        ]);
        let mut loader = StationDataLoader::new(source);

        assert_eq!(loader.load().await.unwrap(), LoadOutcome::Replaced { count: 2 });
        let before = serde_json::to_string(loader.stations()).unwrap();

        assert_eq!(loader.load().await.unwrap(), LoadOutcome::Unchanged);
        let after = serde_json::to_string(loader.stations()).unwrap();

        assert_eq!(before, after);
        assert_eq!(loader.stations(), first.as_slice());
        assert_eq!(
            *loader.source().seen_etags.lock().unwrap(),
            vec![None, Some("\"v1\"".to_string())]
        );
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_snapshot() {
        let source = ScriptedSource::new(vec![
            Ok(StationFetch::Modified {
                stations: vec![station("A", 52.5, 13.4)],
                etag: None,
            }),
            Err(ClientError::bad_status(500, "boom")),
            Err(ClientError::malformed("not a list")),
        ]);
        let mut loader = StationDataLoader::new(source);
        loader.load().await.unwrap();

        let err = loader.load().await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert!(matches!(
            loader.load().await.unwrap_err(),
            ClientError::Load { status: None, .. }
        ));
        assert_eq!(loader.stations().len(), 1);
    }

    #[tokio::test]
    async fn test_modified_replaces_wholesale() {
        let source = ScriptedSource::new(vec![
            Ok(StationFetch::Modified {
                stations: vec![station("A", 52.5, 13.4), station("B", 48.1, 11.6)],
                etag: Some("\"v1\"".to_string()),
            }),
            Ok(StationFetch::Modified {
                stations: vec![station("C", 50.0, 8.0)],
                etag: Some("\"v2\"".to_string()),
            }),
        ]);
        let mut loader = StationDataLoader::new(source);
        loader.load().await.unwrap();
        loader.load().await.unwrap();

        assert_eq!(loader.stations().len(), 1);
        assert_eq!(loader.stations()[0].name, "C");
        assert_eq!(loader.etag(), Some("\"v2\""));
    }
}
