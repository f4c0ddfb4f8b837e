// ABOUTME: Poller states and the rendered progress widget
// ABOUTME: ProgressView mirrors bar, label, report and button states

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    /// No task known.
    Idle,
    /// Start request in flight.
    Starting,
    Running,
    /// Abort accepted, polling until the job reports a terminal state.
    Aborting,
    Finished,
    /// No recent progress on the backend; treated as aborted.
    Stale,
}

impl PollerState {
    /// States in which the poll loop keeps ticking.
    pub fn is_polling(&self) -> bool {
        matches!(self, PollerState::Running | PollerState::Aborting)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PollerState::Finished | PollerState::Stale)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressView {
    pub percent: f64,
    pub label: String,
    pub report: Option<String>,
    pub start_enabled: bool,
    pub abort_visible: bool,
    pub abort_enabled: bool,
}

impl Default for ProgressView {
    fn default() -> Self {
        Self {
            percent: 0.0,
            label: String::new(),
            report: None,
            start_enabled: true,
            abort_visible: false,
            abort_enabled: false,
        }
    }
}

impl ProgressView {
    pub fn set_percent(&mut self, percent: f64) {
        self.percent = if percent.is_finite() {
            percent.clamp(0.0, 100.0)
        } else {
            0.0
        };
    }

    pub fn hide_abort(&mut self) {
        self.abort_visible = false;
        self.abort_enabled = false;
    }

    pub fn show_abort(&mut self) {
        self.abort_visible = true;
        self.abort_enabled = true;
    }
}

/// `m:ss` for a positive estimate, `None` when missing, zero or negative.
pub fn format_eta(seconds: Option<f64>) -> Option<String> {
    let seconds = seconds.filter(|s| s.is_finite() && *s > 0.0)?;
    let total = seconds.round() as u64;
    Some(format!("{}:{:02}", total / 60, total % 60))
}

/// Percent exactly as the backend reported it; non-finite values show as 0.
pub fn format_percent(percent: f64) -> String {
    if percent.is_finite() {
        format!("{}", percent)
    } else {
        "0".to_string()
    }
}
