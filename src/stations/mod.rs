// ABOUTME: Station snapshot module
// ABOUTME: Record shape, coordinate validation and the conditional loader

pub mod loader;
pub mod record;

pub use loader::{LoadOutcome, StationDataLoader, StationSource, LOAD_FAILURE_MESSAGE};
pub use record::{parse_coordinate, StationRecord, StationStatus};
