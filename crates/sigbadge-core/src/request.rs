//! Validated `/verify` request parameters.

use thiserror::Error;
use url::Url;

/// Suffix appended to the document URL to locate its detached signature.
pub const SIGNATURE_SUFFIX: &str = ".asc";

/// Errors produced while parsing request parameters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    /// The `url` parameter is absent or blank.
    #[error("missing url parameter")]
    MissingUrl,
    /// The `url` parameter is not an absolute URL.
    #[error("invalid url parameter: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The `url` parameter uses a scheme other than http or https.
    #[error("unsupported url scheme '{0}'")]
    UnsupportedScheme(String),
}

/// One verification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRequest {
    /// Document to verify.
    pub document_url: Url,
    /// Location of the detached signature (`<document_url>.asc`).
    pub signature_url: Url,
    /// Key to prime into a fresh trust store, if any.
    pub key_id: Option<String>,
    /// Explicit key source, overriding the key server lookup.
    pub key_url: Option<String>,
}

impl VerificationRequest {
    /// Build a request from raw query parameters.
    ///
    /// Blank `key` and `key_url` values are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] if `url` is missing, unparseable or not http(s).
    pub fn from_params(
        url: Option<&str>,
        key: Option<&str>,
        key_url: Option<&str>,
    ) -> Result<Self, InputError> {
        let raw = url.map(str::trim).filter(|u| !u.is_empty()).ok_or(InputError::MissingUrl)?;
        let document_url = Url::parse(raw)?;
        if !matches!(document_url.scheme(), "http" | "https") {
            return Err(InputError::UnsupportedScheme(document_url.scheme().to_owned()));
        }
        let signature_url = Url::parse(&format!("{document_url}{SIGNATURE_SUFFIX}"))?;

        Ok(Self {
            document_url,
            signature_url,
            key_id: non_blank(key),
            key_url: non_blank(key_url),
        })
    }

    /// Last path segment of the document URL, shown on the badge.
    #[must_use]
    pub fn filename(&self) -> String {
        let path = self.document_url.path().trim_end_matches('/');
        match path.rsplit('/').next() {
            Some(segment) if !segment.is_empty() => segment.to_owned(),
            _ => "/".to_owned(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_owned)
}
