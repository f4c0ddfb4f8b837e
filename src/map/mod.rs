// ABOUTME: Map rendering module
// ABOUTME: Surface trait, marker classification, popups and the renderer

pub mod icons;
pub mod popup;
pub mod renderer;
pub mod surface;

pub use icons::{IconStyle, MarkerKind};
pub use renderer::{MapRenderer, RenderSummary};
pub use surface::{HeadlessMap, MapSurface, MarkerId, MarkerSpec, Popup, Viewport};
