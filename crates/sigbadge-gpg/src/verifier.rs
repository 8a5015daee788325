//! Detached signature verification and engine output interpretation.

use std::path::Path;

use log::{error, info};
use sigbadge_core::types::{RetrievedArtifact, VerificationOutcome, VerificationReport};

use crate::engine::VerificationEngine;
use crate::error::VerifyError;
use crate::scratch::{scratch_dir, write_private};
use crate::trust_store::TrustStore;

/// Marker the engine prints on the line describing the signature.
pub const SIGNATURE_MARKER: &str = "Signature made";

const DOCUMENT_FILE: &str = "document";
const SIGNATURE_FILE: &str = "document.asc";
const VERIFY_PREFIX: &str = "sigbadge-verify-";

/// Result of one verification.
#[derive(Debug)]
pub struct Verdict {
    /// Signer identifier, set only when the outcome is valid (possibly empty).
    pub signer: Option<String>,
    /// Why verification did not succeed.
    pub error: Option<VerifyError>,
}

impl Verdict {
    /// Tri-state outcome, derived from [`Verdict::error`].
    #[must_use]
    pub fn outcome(&self) -> VerificationOutcome {
        self.error
            .as_ref()
            .map_or(VerificationOutcome::Valid, VerifyError::outcome)
    }

    /// Convert into the report rendered on the badge.
    #[must_use]
    pub fn into_report(self) -> VerificationReport {
        match self.error {
            None => VerificationReport::valid(self.signer.unwrap_or_default()),
            Some(e @ VerifyError::Rejected(_)) => VerificationReport::invalid(e.to_string()),
            Some(e) => VerificationReport::errored(e.to_string()),
        }
    }
}

/// Signer identifier from engine output: the last whitespace-separated token
/// of the last line containing [`SIGNATURE_MARKER`].
#[must_use]
pub fn extract_signer(output: &str) -> Option<String> {
    output
        .lines()
        .rev()
        .find(|line| line.contains(SIGNATURE_MARKER))
        .and_then(|line| line.split_whitespace().last())
        .map(str::to_owned)
}

/// Verify `signature` over `document` in a private scratch directory under
/// `scratch_root`. The directory is removed before this returns.
pub async fn verify(
    engine: &dyn VerificationEngine,
    document: &RetrievedArtifact,
    signature: &RetrievedArtifact,
    trust_store: Option<&TrustStore>,
    scratch_root: &Path,
) -> Verdict {
    match run(engine, document, signature, trust_store, scratch_root).await {
        Ok(signer) => {
            info!("signature on {} is valid, signer '{signer}'", document.url);
            Verdict {
                signer: Some(signer),
                error: None,
            }
        }
        Err(e) => Verdict {
            signer: None,
            error: Some(e),
        },
    }
}

async fn run(
    engine: &dyn VerificationEngine,
    document: &RetrievedArtifact,
    signature: &RetrievedArtifact,
    trust_store: Option<&TrustStore>,
    scratch_root: &Path,
) -> Result<String, VerifyError> {
    let dir = scratch_dir(scratch_root, VERIFY_PREFIX).map_err(VerifyError::Scratch)?;
    let document_path = dir.path().join(DOCUMENT_FILE);
    let signature_path = dir.path().join(SIGNATURE_FILE);
    write_private(&document_path, &document.bytes).map_err(VerifyError::Scratch)?;
    write_private(&signature_path, &signature.bytes).map_err(VerifyError::Scratch)?;

    let report = engine
        .verify_detached(trust_store, &signature_path, &document_path)
        .await?;

    if !report.success {
        error!("verification of {} failed: {}", document.url, report.output);
        let output = report.output.trim();
        let reason = if output.is_empty() {
            match report.code {
                Some(code) => format!("verification engine exited with status {code}"),
                None => "verification engine was terminated by a signal".to_owned(),
            }
        } else {
            output.to_owned()
        };
        return Err(VerifyError::Rejected(reason));
    }

    Ok(extract_signer(&report.output).unwrap_or_default())
}
