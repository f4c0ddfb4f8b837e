// ABOUTME: Error taxonomy shared by the loader, poller, forms and offline worker
// ABOUTME: Every variant maps to a user-visible status message, none are fatal

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Bad HTTP status or a payload that does not have the expected shape.
    #[error("Load error: {message}")]
    Load {
        status: Option<u16>,
        message: String,
    },

    /// The request never produced a response (offline, timeout, DNS).
    #[error("Network error: {0}")]
    Network(String),

    /// Well-formed backend answer saying the operation could not proceed.
    #[error("Backend refused: {reason}")]
    BackendRefusal { reason: String },

    #[error("Validation error: {0}")]
    Validation(String),

    /// Action rejected locally without issuing any request.
    #[error("Action not available: {0}")]
    ActionUnavailable(&'static str),
}

impl ClientError {
    pub fn bad_status(status: u16, body: impl Into<String>) -> Self {
        ClientError::Load {
            status: Some(status),
            message: body.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        ClientError::Load {
            status: None,
            message: message.into(),
        }
    }

    pub fn refusal(reason: Option<String>) -> Self {
        ClientError::BackendRefusal {
            reason: reason
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network(_))
    }

    /// HTTP status carried by a load failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Load { status, .. } => *status,
            _ => None,
        }
    }

    /// Text shown to the user in the widget that hit the error.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Load { status: Some(code), .. } => {
                format!("Request failed (HTTP {})", code)
            }
            ClientError::Load { status: None, message } => {
                format!("Unexpected response format: {}", message)
            }
            ClientError::Network(_) => "Network unavailable".to_string(),
            ClientError::BackendRefusal { reason } => format!("Not possible: {}", reason),
            ClientError::Validation(msg) => msg.clone(),
            ClientError::ActionUnavailable(action) => {
                format!("'{}' is not available right now", action)
            }
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return ClientError::malformed(err.to_string());
        }
        if let Some(status) = err.status() {
            return ClientError::bad_status(status.as_u16(), err.to_string());
        }
        ClientError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::malformed(err.to_string())
    }
}
