// ABOUTME: Turns a device location fix into the nearest-stations panel
// ABOUTME: Caches the last fix for the configured maximum age

use std::time::{Duration, Instant};

use tracing::{error, info};

use crate::config::GeolocationConfig;
use crate::geo::LatLng;
use crate::stations::StationRecord;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationFix {
    pub position: LatLng,
    pub accuracy_m: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NearestStation {
    pub name: String,
    pub address: String,
    pub distance_km: f64,
}

impl NearestStation {
    pub fn distance_label(&self) -> String {
        format!("{:.1}km", self.distance_km)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NearestPanel {
    pub anchor: LatLng,
    pub accuracy_m: u64,
    pub entries: Vec<NearestStation>,
}

/// Options handed to the platform's location provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocateOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    pub max_age: Duration,
    pub max_zoom: u8,
}

pub struct GeolocationAssistant {
    options: LocateOptions,
    nearest_count: usize,
    last_fix: Option<(LocationFix, Instant)>,
}

impl GeolocationAssistant {
    pub fn new(config: &GeolocationConfig) -> Self {
        Self {
            options: LocateOptions {
                high_accuracy: config.high_accuracy,
                timeout: Duration::from_secs(config.timeout_secs),
                max_age: Duration::from_secs(config.max_age_secs),
                max_zoom: config.max_zoom,
            },
            nearest_count: config.nearest_count,
            last_fix: None,
        }
    }

    pub fn options(&self) -> LocateOptions {
        self.options
    }

    /// Last fix if it is younger than the maximum age at `now`.
    pub fn cached_fix(&self, now: Instant) -> Option<LocationFix> {
        let (fix, at) = self.last_fix?;
        (now.saturating_duration_since(at) <= self.options.max_age).then_some(fix)
    }

    pub fn on_location_found(
        &mut self,
        fix: LocationFix,
        stations: &[StationRecord],
    ) -> Option<NearestPanel> {
        self.on_location_found_at(fix, stations, Instant::now())
    }

    pub fn on_location_found_at(
        &mut self,
        fix: LocationFix,
        stations: &[StationRecord],
        now: Instant,
    ) -> Option<NearestPanel> {
        info!(
            "Location found: {}, {} (accuracy: {}m)",
            fix.position.lat,
            fix.position.lng,
            fix.accuracy_m.round()
        );
        self.last_fix = Some((fix, now));
        self.panel_for(fix, stations)
    }

    /// Nearest-stations panel for `fix`; `None` when nothing is mapped.
    pub fn panel_for(&self, fix: LocationFix, stations: &[StationRecord]) -> Option<NearestPanel> {
        let entries = nearest_stations(fix.position, stations, self.nearest_count);
        if entries.is_empty() {
            return None;
        }
        Some(NearestPanel {
            anchor: fix.position,
            accuracy_m: fix.accuracy_m.max(0.0).round() as u64,
            entries,
        })
    }

    /// Message shown to the user for a failed location lookup.
    pub fn on_location_error(&self, message: &str) -> String {
        error!("Location error: {}", message);
        format!("Location lookup failed: {}", message)
    }
}

/// Mapped stations sorted by distance from `origin`, first `count` only.
pub fn nearest_stations(
    origin: LatLng,
    stations: &[StationRecord],
    count: usize,
) -> Vec<NearestStation> {
    let mut ranked: Vec<NearestStation> = stations
        .iter()
        .filter_map(|s| {
            let position = s.position()?;
            Some(NearestStation {
                name: s.name.clone(),
                address: s.address.clone(),
                distance_km: origin.distance_km(&position),
            })
        })
        .collect();
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked.truncate(count);
    ranked
}
