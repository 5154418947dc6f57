//! Error types for the Dagwatch client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to a running DAG
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// Connection reset, timeout or a temporarily unavailable endpoint.
    /// The only kind the completion monitor retries.
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote side rejected the request (unknown DAG, refused kill, bad reply)
    #[error("remote error (status {status}): {message}")]
    Remote {
        /// HTTP status code, 0 when the failure was not an HTTP reply
        status: u16,
        /// Error message from the remote side
        message: String,
    },

    /// Named vertex does not exist in this DAG
    #[error("vertex not found: {0}")]
    NotFound(String),

    /// Operation attempted after the client was closed
    #[error("client is closed")]
    ClientClosed,
}

impl ClientError {
    /// Create a remote error from status code and message
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: message.into(),
        }
    }

    /// Check if the failure is worth retrying
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if the client was closed underneath the caller
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::ClientClosed)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        let status = err.status().map(|s| s.as_u16()).unwrap_or(0);
        if err.is_timeout() || err.is_connect() || err.is_body() || err.is_request() {
            return Self::Transport(err.to_string());
        }
        if err.is_builder() || err.is_redirect() {
            return Self::remote(status, format!("Invalid request: {}", err));
        }
        if err.is_decode() {
            return Self::remote(status, format!("Failed to parse response: {}", err));
        }
        if err.status().is_some() {
            return Self::remote(status, err.to_string());
        }
        Self::Transport(err.to_string())
    }
}
