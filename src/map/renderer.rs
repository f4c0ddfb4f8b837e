// ABOUTME: Places one marker per mapped station and frames the viewport
// ABOUTME: Re-rendering always clears the previous marker set first

use std::collections::HashSet;

use tracing::{debug, info, warn};

use super::icons::{IconStyle, MarkerKind};
use super::popup::station_popup;
use super::surface::{MapSurface, MarkerId, MarkerSpec, Popup};
use crate::config::{MapConfig, MarkerColors};
use crate::geo::{Bounds, LatLng};
use crate::stations::StationRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderSummary {
    pub placed: usize,
    pub skipped: usize,
}

struct Placed {
    id: MarkerId,
    key: String,
}

pub struct MapRenderer<M> {
    surface: M,
    placed: Vec<Placed>,
    colors: MarkerColors,
    fit_padding: f64,
    focus_padding: f64,
    focus_zoom: u8,
}

impl<M: MapSurface> MapRenderer<M> {
    /// Wraps `surface` and frames it at the configured country-level view.
    pub fn new(mut surface: M, config: &MapConfig) -> Self {
        surface.set_view(config.center(), config.default_zoom);
        Self {
            surface,
            placed: Vec::new(),
            colors: config.colors.clone(),
            fit_padding: config.fit_padding,
            focus_padding: config.focus_padding,
            focus_zoom: config.focus_zoom,
        }
    }

    pub fn render(&mut self, stations: &[StationRecord]) -> RenderSummary {
        self.clear();

        let mut summary = RenderSummary::default();
        let mut bounds: Option<Bounds> = None;

        for station in stations {
            let Some(position) = station.position() else {
                warn!(
                    "Station without valid coordinates: {} (lat: {}, lng: {})",
                    station.name, station.latitude, station.longitude
                );
                summary.skipped += 1;
                continue;
            };

            let kind = MarkerKind::classify(station);
            let id = self.surface.add_marker(MarkerSpec {
                position,
                kind,
                icon: IconStyle::for_kind(kind, &self.colors),
                popup_html: station_popup(station),
            });
            self.placed.push(Placed {
                id,
                key: station.highlight_key(),
            });

            match bounds.as_mut() {
                Some(b) => b.extend(position),
                None => bounds = Some(Bounds::from_point(position)),
            }
            summary.placed += 1;
        }

        info!(
            "Markers placed: {}, skipped: {}, total stations: {}",
            summary.placed,
            summary.skipped,
            stations.len()
        );

        if let Some(b) = bounds {
            self.surface.fit_bounds(b.pad(self.fit_padding));
        }
        summary
    }

    fn clear(&mut self) {
        for placed in self.placed.drain(..) {
            self.surface.remove_marker(placed.id);
        }
    }

    /// Highlights exactly the markers whose station key is in `keys`.
    pub fn highlight(&mut self, keys: &HashSet<String>) {
        for placed in &self.placed {
            self.surface
                .set_highlight(placed.id, keys.contains(&placed.key));
        }
    }

    /// Recenters on the given points: fly-to for one, padded fit for several.
    pub fn focus(&mut self, points: &[LatLng]) {
        match points {
            [] => debug!("Nothing mappable to focus"),
            [single] => self.surface.fly_to(*single, self.focus_zoom),
            many => {
                if let Some(b) = Bounds::from_points(many.iter().copied()) {
                    self.surface.fit_bounds(b.pad(self.focus_padding));
                }
            }
        }
    }

    pub fn open_popup(&mut self, anchor: LatLng, html: String) {
        self.surface.open_popup(Popup { anchor, html });
    }

    pub fn marker_count(&self) -> usize {
        self.placed.len()
    }

    pub fn surface(&self) -> &M {
        &self.surface
    }
}
