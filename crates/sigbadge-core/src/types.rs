//! Verification outcomes, fetched artifacts and per-request reports.

use std::fmt;

use url::Url;

/// Tri-state result of verifying one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerificationOutcome {
    /// The engine accepted the signature.
    Valid,
    /// The engine ran and rejected the signature.
    Invalid,
    /// Verification could not be carried out at all.
    Errored,
}

impl VerificationOutcome {
    /// Lowercase name used in log lines.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Invalid => "invalid",
            Self::Errored => "errored",
        }
    }
}

impl fmt::Display for VerificationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw bytes downloaded from a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievedArtifact {
    /// Where the bytes came from.
    pub url: Url,
    /// The response body.
    pub bytes: Vec<u8>,
}

impl RetrievedArtifact {
    /// Wrap a downloaded body.
    #[must_use]
    pub fn new(url: Url, bytes: Vec<u8>) -> Self {
        Self { url, bytes }
    }
}

/// Everything one pipeline pass produced, ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationReport {
    /// Final outcome of the request.
    pub outcome: VerificationOutcome,
    /// Signer key identifier, only set for [`VerificationOutcome::Valid`].
    pub signer: Option<String>,
    /// Human-readable failure detail, never set for [`VerificationOutcome::Valid`].
    pub reason: Option<String>,
}

impl VerificationReport {
    /// A successful verification by `signer` (which may be empty).
    #[must_use]
    pub fn valid(signer: impl Into<String>) -> Self {
        Self {
            outcome: VerificationOutcome::Valid,
            signer: Some(signer.into()),
            reason: None,
        }
    }

    /// A rejected signature.
    #[must_use]
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::failed(VerificationOutcome::Invalid, reason)
    }

    /// A request that could not be verified.
    #[must_use]
    pub fn errored(reason: impl Into<String>) -> Self {
        Self::failed(VerificationOutcome::Errored, reason)
    }

    fn failed(outcome: VerificationOutcome, reason: impl Into<String>) -> Self {
        Self {
            outcome,
            signer: None,
            reason: Some(reason.into()),
        }
    }
}
