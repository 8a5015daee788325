//! Error types for key import and signature verification.

use std::time::Duration;

use sigbadge_client::error::FetchError;
use sigbadge_core::types::VerificationOutcome;
use thiserror::Error;

/// Errors raised while driving the external verification engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine binary could not be started.
    #[error("failed to start verification engine '{binary}': {source}")]
    Spawn {
        /// Configured engine path.
        binary: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },
    /// The engine did not exit within the configured timeout and was killed.
    #[error("verification engine timed out after {}s", .0.as_secs_f32())]
    Timeout(Duration),
    /// Waiting on the engine process failed.
    #[error("I/O error talking to verification engine: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that abort trust store priming.
#[derive(Debug, Error)]
pub enum PrimeError {
    /// No key identifier was supplied.
    #[error("missing key identifier")]
    MissingKeyId,
    /// The key source URL is not a valid absolute URL.
    #[error("invalid key url '{url}': {source}")]
    InvalidKeyUrl {
        /// The rejected URL.
        url: String,
        /// Parse failure.
        #[source]
        source: url::ParseError,
    },
    /// The key material could not be downloaded.
    #[error("fetching key failed: {0}")]
    Fetch(#[from] FetchError),
    /// The trust store directory could not be created.
    #[error("creating trust store failed: {0}")]
    Scratch(#[source] std::io::Error),
    /// The engine could not run the import.
    #[error("key import failed: {0}")]
    Engine(#[from] EngineError),
    /// The engine ran but refused the key material.
    #[error("importing key {key_id} failed: {output}")]
    Import {
        /// Key that was being primed.
        key_id: String,
        /// Captured engine output.
        output: String,
    },
}

/// Errors produced while verifying a detached signature.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The working directory or its files could not be written.
    #[error("preparing verification files failed: {0}")]
    Scratch(#[source] std::io::Error),
    /// The engine could not be run to completion.
    #[error(transparent)]
    Engine(#[from] EngineError),
    /// The engine ran and rejected the signature.
    #[error("{0}")]
    Rejected(String),
}

impl VerifyError {
    /// Outcome this failure maps to.
    ///
    /// Only a completed engine run that rejected the signature is
    /// [`VerificationOutcome::Invalid`].
    #[must_use]
    pub fn outcome(&self) -> VerificationOutcome {
        match self {
            Self::Rejected(_) => VerificationOutcome::Invalid,
            Self::Scratch(_) | Self::Engine(_) => VerificationOutcome::Errored,
        }
    }
}
