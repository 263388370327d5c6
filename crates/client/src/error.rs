//! Typed error enum for the client crate.

use thiserror::Error;

/// Errors from a single resource request. The client never retries; callers
/// inspect [`ClientError::is_transient`] to decide.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("client initialization failed: {0}")]
    ClientInit(String),
    /// The request never completed (connect, timeout, body read).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// A 2xx body that does not match the expected envelope.
    #[error("malformed response in {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    /// Non-2xx response. `message` comes from the error envelope when present.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
    /// 2xx response with `success: false`.
    #[error("request rejected: {message}")]
    Rejected { message: String },
}

impl ClientError {
    /// Whether retrying the same request may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Api { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            _ => false,
        }
    }

    /// Server rejected the payload; the message is meant for the user as-is.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        match self {
            Self::Api { status, .. } => (400..500).contains(status) && *status != 429,
            Self::Rejected { .. } => true,
            _ => false,
        }
    }

    /// HTTP status when the server answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Text a view can show in a toast or inline message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } | Self::Rejected { message } if self.is_validation() => {
                message.clone()
            },
            Self::Transport(_) | Self::Decode { .. } => {
                "Could not reach the server. Please try again.".to_owned()
            },
            _ => "Something went wrong. Please try again.".to_owned(),
        }
    }
}
