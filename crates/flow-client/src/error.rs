//! Flow API client errors.

use thiserror::Error;

/// Failure of a call against the Flow API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure: connect, TLS, timeout or body read.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Flow answered with a non-2xx status.
    #[error("API error (status {status}): {message}")]
    Api {
        /// Status code of the response.
        status: u16,
        /// `message`/`error` field of the JSON body, or the raw body.
        message: String,
    },

    /// The response body didn't match the expected Flow type.
    #[error("Failed to deserialize response: {0}")]
    Deserialize(#[from] serde_json::Error),

    /// Base URL without an `http://` or `https://` scheme.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Shorthand for results of Flow API calls.
pub type Result<T> = std::result::Result<T, ClientError>;
