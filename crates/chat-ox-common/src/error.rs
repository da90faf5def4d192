use thiserror::Error;

/// Errors that can occur while sending a chat request or reading its event stream
#[derive(Error, Debug)]
pub enum CommonRequestError {
    /// Network or connection failure, passed through from the HTTP client unmodified
    #[error("HTTP transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response has no readable body at all
    #[error("Response body is empty (HTTP {status})")]
    EmptyBody { status: u16 },

    /// A `data: ` line whose payload is not a known event
    #[error("Invalid event data: {0}")]
    InvalidEventData(String),

    /// Client configuration could not be read from the environment
    #[error("Invalid configuration: {0}")]
    Config(#[from] std::env::VarError),
}

impl CommonRequestError {
    /// Whether the error fails the whole call, as opposed to a single dropped line.
    #[must_use]
    pub fn is_call_level(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::EmptyBody { .. } | Self::Config(_)
        )
    }
}

/// Statuses that by definition carry no response body.
pub(crate) fn is_null_body_status(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 101 | 103 | 204 | 205 | 304)
}
