// ABOUTME: TOML configuration for endpoints, timings and map framing
// ABOUTME: Every field has a default so an empty or missing file is valid

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::geo::LatLng;

pub const BASE_URL_ENV: &str = "WVH_BASE_URL";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub stations_path: String,
    pub request_timeout_secs: u64,
    /// Form for proposing new stations. Absent means no form is offered.
    pub report_url: Option<String>,
    pub backfill: BackfillConfig,
    pub geolocation: GeolocationConfig,
    pub map: MapConfig,
    pub offline: OfflineConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            stations_path: "/stationen/daten/".to_string(),
            request_timeout_secs: 30,
            report_url: None,
            backfill: BackfillConfig::default(),
            geolocation: GeolocationConfig::default(),
            map: MapConfig::default(),
            offline: OfflineConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        let config: ClientConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` when given, otherwise defaults, then applies the base URL
    /// override (explicit flag first, then `WVH_BASE_URL`).
    pub fn resolve(path: Option<&Path>, base_url: Option<String>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::load(p)?,
            None => Self::default(),
        };
        if let Some(url) = base_url.or_else(|| std::env::var(BASE_URL_ENV).ok()) {
            config.base_url = url;
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            anyhow::bail!("base_url must start with http:// or https://, got '{}'", self.base_url);
        }
        if self.backfill.poll_interval_ms == 0 {
            anyhow::bail!("backfill.poll_interval_ms must be greater than zero");
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackfillConfig {
    pub progress_path: String,
    pub start_path: String,
    pub abort_path: String,
    pub poll_interval_ms: u64,
}

impl Default for BackfillConfig {
    fn default() -> Self {
        Self {
            progress_path: "/bird/region-backfill/progress/".to_string(),
            start_path: "/bird/region-backfill/start/".to_string(),
            abort_path: "/bird/region-backfill/abort/".to_string(),
            poll_interval_ms: 2500,
        }
    }
}

impl BackfillConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeolocationConfig {
    pub timeout_secs: u64,
    pub max_age_secs: u64,
    pub high_accuracy: bool,
    pub max_zoom: u8,
    pub nearest_count: usize,
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            max_age_secs: 300,
            high_accuracy: true,
            max_zoom: 12,
            nearest_count: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub default_center: [f64; 2],
    pub default_zoom: u8,
    pub fit_padding: f64,
    pub focus_padding: f64,
    pub focus_zoom: u8,
    pub max_results: usize,
    pub colors: MarkerColors,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_center: [51.1657, 10.4515],
            default_zoom: 6,
            fit_padding: 0.1,
            focus_padding: 0.2,
            focus_zoom: 11,
            max_results: 25,
            colors: MarkerColors::default(),
        }
    }
}

impl MapConfig {
    pub fn center(&self) -> LatLng {
        LatLng::new(self.default_center[0], self.default_center[1])
    }
}

/// Fill colors per marker variant, matching the `--status-*` CSS variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarkerColors {
    pub active: String,
    pub inactive: String,
    pub partner: String,
    pub raptor: String,
}

impl Default for MarkerColors {
    fn default() -> Self {
        Self {
            active: "#4a7c59".to_string(),
            inactive: "#6c757d".to_string(),
            partner: "#007bff".to_string(),
            raptor: "#8b5a2b".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OfflineConfig {
    pub cache_name: String,
    pub cache_version: String,
    pub offline_url: String,
    pub ping_url: String,
    pub data_prefix: String,
    pub skip_prefixes: Vec<String>,
    pub precache_urls: Vec<String>,
    pub navigation_timeout_ms: u64,
    pub ping_timeout_ms: u64,
}

impl Default for OfflineConfig {
    fn default() -> Self {
        Self {
            cache_name: "fbf-pwa-v1".to_string(),
            cache_version: "v2".to_string(),
            offline_url: "/offline/".to_string(),
            ping_url: "/ping/".to_string(),
            data_prefix: "/stationen/daten/".to_string(),
            skip_prefixes: vec![
                "/bird/geocode-found-location/".to_string(),
                "/ping/".to_string(),
                "/api/".to_string(),
            ],
            precache_urls: vec![
                "/accounts/login/".to_string(),
                "/offline/".to_string(),
                "/static/css/style.css".to_string(),
                "/static/css/login.css".to_string(),
                "/static/img/logo/wvh.svg".to_string(),
                "/static/img/appicon/appiconfbf.png".to_string(),
            ],
            navigation_timeout_ms: 5000,
            ping_timeout_ms: 2500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = ClientConfig::from_toml("").unwrap();
        assert_eq!(config.backfill.poll_interval(), Duration::from_millis(2500));
        assert_eq!(config.geolocation.timeout_secs, 10);
        assert_eq!(config.geolocation.max_age_secs, 300);
        assert_eq!(config.map.max_results, 25);
        assert_eq!(config.map.default_zoom, 6);
        assert_eq!(config.stations_path, "/stationen/daten/");
    }

    #[test]
    fn test_partial_sections_merge_with_defaults() {
        let raw = r##"
            base_url = "https://wvh.example.org"

            [backfill]
            poll_interval_ms = 1000

            [map.colors]
            raptor = "#aa5500"
        "##;
        let config = ClientConfig::from_toml(raw).unwrap();
        assert_eq!(config.base_url, "https://wvh.example.org");
        assert_eq!(config.backfill.poll_interval_ms, 1000);
        assert_eq!(config.backfill.start_path, "/bird/region-backfill/start/");
        assert_eq!(config.map.colors.raptor, "#aa5500");
        assert_eq!(config.map.colors.active, "#4a7c59");
    }

    #[test]
    fn test_rejects_zero_poll_interval() {
        let raw = "[backfill]\npoll_interval_ms = 0\n";
        assert!(ClientConfig::from_toml(raw).is_err());
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        assert!(ClientConfig::from_toml("base_url = \"ftp://x\"").is_err());
    }

    #[test]
    fn test_load_from_file_and_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url = \"https://from-file.example\"").unwrap();

        let config = ClientConfig::load(file.path()).unwrap();
        assert_eq!(config.base_url, "https://from-file.example");

        let config = ClientConfig::resolve(
            Some(file.path()),
            Some("https://override.example".to_string()),
        )
        .unwrap();
        assert_eq!(config.base_url, "https://override.example");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = ClientConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
