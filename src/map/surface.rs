// ABOUTME: Drawing surface abstraction the renderer talks to instead of Leaflet
// ABOUTME: HeadlessMap records markers, viewport and popups in memory

use std::collections::BTreeMap;

use super::icons::{IconStyle, MarkerKind};
use crate::geo::{Bounds, LatLng};

pub type MarkerId = u64;

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub position: LatLng,
    pub kind: MarkerKind,
    pub icon: IconStyle,
    pub popup_html: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Viewport {
    Center { center: LatLng, zoom: u8 },
    Bounds(Bounds),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub anchor: LatLng,
    pub html: String,
}

pub trait MapSurface {
    fn add_marker(&mut self, marker: MarkerSpec) -> MarkerId;
    fn remove_marker(&mut self, id: MarkerId);
    fn set_highlight(&mut self, id: MarkerId, highlighted: bool);
    fn set_view(&mut self, center: LatLng, zoom: u8);
    fn fit_bounds(&mut self, bounds: Bounds);
    fn fly_to(&mut self, center: LatLng, zoom: u8);
    fn open_popup(&mut self, popup: Popup);
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMarker {
    pub spec: MarkerSpec,
    pub highlighted: bool,
}

#[derive(Debug, Default)]
pub struct HeadlessMap {
    next_id: MarkerId,
    markers: BTreeMap<MarkerId, PlacedMarker>,
    viewport: Option<Viewport>,
    popup: Option<Popup>,
}

impl HeadlessMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn markers(&self) -> impl Iterator<Item = &PlacedMarker> {
        self.markers.values()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn highlighted_count(&self) -> usize {
        self.markers.values().filter(|m| m.highlighted).count()
    }

    pub fn viewport(&self) -> Option<&Viewport> {
        self.viewport.as_ref()
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }
}

impl MapSurface for HeadlessMap {
    fn add_marker(&mut self, marker: MarkerSpec) -> MarkerId {
        self.next_id += 1;
        self.markers.insert(
            self.next_id,
            PlacedMarker {
                spec: marker,
                highlighted: false,
            },
        );
        self.next_id
    }

    fn remove_marker(&mut self, id: MarkerId) {
        self.markers.remove(&id);
    }

    fn set_highlight(&mut self, id: MarkerId, highlighted: bool) {
        if let Some(marker) = self.markers.get_mut(&id) {
            marker.highlighted = highlighted;
        }
    }

    fn set_view(&mut self, center: LatLng, zoom: u8) {
        self.viewport = Some(Viewport::Center { center, zoom });
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        self.viewport = Some(Viewport::Bounds(bounds));
    }

    fn fly_to(&mut self, center: LatLng, zoom: u8) {
        self.viewport = Some(Viewport::Center { center, zoom });
    }

    fn open_popup(&mut self, popup: Popup) {
        self.popup = Some(popup);
    }
}
