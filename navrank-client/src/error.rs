use std::time::Duration;

use thiserror::Error;

/// Failures surfaced by the client. Terminal failures resolve to a single
/// message string on the lifecycle; [`ClientError::Cancelled`] is the one
/// variant that must never reach it.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("failed to decode response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("ranking stream failed: {0}")]
    Stream(String),

    #[error("no terminal event within {}s", .after.as_secs())]
    Timeout { after: Duration },

    /// The request was superseded by a newer one. Absorbed silently by
    /// callers; the newer request owns all visible state.
    #[error("fetch cancelled")]
    Cancelled,

    #[error(transparent)]
    Invalid(#[from] navrank_model::ModelError),

    #[error("empty response from server")]
    EmptyResponse,
}

impl ClientError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClientError::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
