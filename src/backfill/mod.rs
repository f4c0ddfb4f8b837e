// ABOUTME: Region backfill progress module
// ABOUTME: Poller state machine, rendered view and the API seam it polls through

pub mod poller;
pub mod state;

pub use poller::{BackfillApi, JobProgressPoller};
pub use state::{format_eta, PollerState, ProgressView};
