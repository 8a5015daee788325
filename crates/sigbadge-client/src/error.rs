//! Error types for document retrieval.

use thiserror::Error;

/// Errors that can occur while fetching a remote artifact.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a non-success status.
    #[error("unexpected status {status} for {url}")]
    Status {
        /// URL that was requested.
        url: String,
        /// HTTP status code received.
        status: u16,
    },
    /// The request did not complete within the client timeout.
    #[error("request to {url} timed out")]
    Timeout {
        /// URL that was requested.
        url: String,
    },
    /// The request could not be sent or the body could not be read.
    #[error("request to {url} failed: {source}")]
    Transport {
        /// URL that was requested.
        url: String,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },
    /// The HTTP client itself could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl FetchError {
    /// Classify a `reqwest` error raised while talking to `url`.
    #[must_use]
    pub fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { url: url.to_owned() }
        } else {
            Self::Transport {
                url: url.to_owned(),
                source,
            }
        }
    }
}
