// ABOUTME: Client-side state machine for the region backfill job
// ABOUTME: Issues start/abort requests and polls status until a terminal state

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::state::{format_eta, format_percent, PollerState, ProgressView};
use crate::error::ClientError;
use crate::remote::{AbortResponse, ProgressResponse, StartResponse};

/// Control and status endpoints of the backfill job.
#[async_trait]
pub trait BackfillApi: Send + Sync {
    async fn progress(&self) -> Result<ProgressResponse, ClientError>;
    async fn start(&self) -> Result<StartResponse, ClientError>;
    async fn abort(&self) -> Result<AbortResponse, ClientError>;
}

fn failure_suffix(err: &ClientError) -> String {
    match err.status() {
        Some(code) => format!("HTTP {}", code),
        None => "network".to_string(),
    }
}

pub struct JobProgressPoller<A> {
    api: A,
    state: PollerState,
    view: ProgressView,
    task_id: Option<String>,
    interval: Duration,
}

impl<A: BackfillApi> JobProgressPoller<A> {
    pub fn new(api: A, interval: Duration) -> Self {
        Self {
            api,
            state: PollerState::Idle,
            view: ProgressView::default(),
            task_id: None,
            interval,
        }
    }

    pub fn state(&self) -> PollerState {
        self.state
    }

    pub fn view(&self) -> &ProgressView {
        &self.view
    }

    pub fn task_id(&self) -> Option<&str> {
        self.task_id.as_deref()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Fetches status once and renders it. Failures are rendered into the
    /// label and leave the state unchanged.
    pub async fn poll(&mut self) -> Result<PollerState, ClientError> {
        match self.api.progress().await {
            Ok(status) => Ok(self.apply(&status)),
            Err(e) => {
                warn!("Backfill status request failed: {}", e);
                self.view.label = match e.status() {
                    Some(code) => format!("Status error ({})", code),
                    None => "Status could not be loaded".to_string(),
                };
                Err(e)
            }
        }
    }

    /// Renders one status snapshot and derives the next state from it.
    pub fn apply(&mut self, status: &ProgressResponse) -> PollerState {
        let Some(task_id) = status.task_id.clone() else {
            self.view.set_percent(0.0);
            self.view.label = "No active task".to_string();
            self.view.start_enabled = true;
            self.view.hide_abort();
            self.task_id = None;
            return self.transition(PollerState::Idle);
        };
        self.task_id = Some(task_id);
        self.view.set_percent(status.percent);

        if status.stale {
            self.view.label =
                "Aborted / no activity (stale). Please start again.".to_string();
            self.view.start_enabled = true;
            self.view.hide_abort();
            return self.transition(PollerState::Stale);
        }

        if status.active {
            let eta = format_eta(status.eta_seconds)
                .map(|eta| format!(" ETA {}", eta))
                .unwrap_or_default();
            self.view.label = format!(
                "Running: {}% ({}/{}){}",
                format_percent(status.percent),
                status.processed,
                status.total,
                eta
            );
            self.view.start_enabled = false;
            self.view.abort_visible = true;
            self.view.abort_enabled = self.state != PollerState::Aborting;
            return self.keep_polling();
        }

        if status.finished {
            self.view.label = format!(
                "Finished: {} succeeded, {} errors",
                status.success, status.errors
            );
            self.view.start_enabled = true;
            self.view.hide_abort();
            self.view.report = Some(if status.errors > 0 {
                format!(
                    "Done. Succeeded: {}, errors: {}. See geocode attempts / patients without region for details.",
                    status.success, status.errors
                )
            } else {
                format!("Done. All {} patients received a region.", status.success)
            });
            return self.transition(PollerState::Finished);
        }

        self.view.label = "Waiting…".to_string();
        self.view.hide_abort();
        self.keep_polling()
    }

    fn keep_polling(&mut self) -> PollerState {
        if self.state == PollerState::Aborting {
            return self.state;
        }
        self.transition(PollerState::Running)
    }

    fn transition(&mut self, next: PollerState) -> PollerState {
        if self.state != next {
            info!("Backfill poller: {:?} -> {:?}", self.state, next);
            self.state = next;
        }
        next
    }

    pub async fn start(&mut self) -> Result<PollerState, ClientError> {
        if matches!(
            self.state,
            PollerState::Starting | PollerState::Running | PollerState::Aborting
        ) {
            return Err(ClientError::ActionUnavailable("start"));
        }

        self.transition(PollerState::Starting);
        self.view.start_enabled = false;
        self.view.report = None;
        self.view.label = "Starting…".to_string();

        let response = match self.api.start().await {
            Ok(r) => r,
            Err(e) => {
                warn!("Backfill start failed: {}", e);
                self.view.label = format!("Start failed ({})", failure_suffix(&e));
                self.view.start_enabled = true;
                self.transition(PollerState::Idle);
                return Err(e);
            }
        };

        if response.started {
            self.view.label = "Started…".to_string();
            self.task_id = response.task_id;
            return Ok(self.transition(PollerState::Running));
        }
        if let Some(task_id) = response.task_id {
            self.view.label = format!("Already running (task {})", task_id);
            self.task_id = Some(task_id);
            return Ok(self.transition(PollerState::Running));
        }

        let err = ClientError::refusal(response.reason);
        if let ClientError::BackendRefusal { reason } = &err {
            self.view.label = format!("Start not possible: {}", reason);
        }
        self.view.start_enabled = true;
        self.transition(PollerState::Idle);
        Err(err)
    }

    /// Requests an abort. Only valid while Running with the abort action
    /// enabled; otherwise nothing is sent.
    pub async fn abort(&mut self) -> Result<PollerState, ClientError> {
        if self.state != PollerState::Running || !self.view.abort_enabled {
            debug!("Abort rejected locally in state {:?}", self.state);
            return Err(ClientError::ActionUnavailable("abort"));
        }
        self.view.abort_enabled = false;

        match self.api.abort().await {
            Ok(resp) if resp.aborted => {
                self.view.label = "Abort requested…".to_string();
                Ok(self.transition(PollerState::Aborting))
            }
            Ok(resp) => {
                let err = ClientError::refusal(resp.reason);
                if let ClientError::BackendRefusal { reason } = &err {
                    self.view.label = format!("Abort not possible: {}", reason);
                }
                self.view.abort_enabled = true;
                Err(err)
            }
            Err(e) => {
                warn!("Backfill abort failed: {}", e);
                self.view.label = format!("Abort failed ({})", failure_suffix(&e));
                self.view.abort_enabled = true;
                Err(e)
            }
        }
    }

    /// Polls on the configured interval while Running or Aborting. The first
    /// poll happens immediately. Returns the state the loop stopped in.
    pub async fn run<F>(&mut self, mut on_tick: F) -> PollerState
    where
        F: FnMut(PollerState, &ProgressView),
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while self.state.is_polling() {
            ticker.tick().await;
            // Network failures are already rendered; the next tick retries.
            let _ = self.poll().await;
            on_tick(self.state, &self.view);
        }
        self.state
    }
}
