//! Priming a fresh trust store with one public key.

use std::path::Path;

use log::{info, warn};
use sigbadge_client::client::DocumentFetcher;
use url::Url;

use crate::engine::VerificationEngine;
use crate::error::PrimeError;
use crate::trust_store::TrustStore;

/// HKP lookup URL for `key_id` on `keyserver`.
///
/// # Errors
///
/// Returns [`PrimeError::InvalidKeyUrl`] if the resulting URL does not parse.
pub fn key_source_url(keyserver: &Url, key_id: &str) -> Result<Url, PrimeError> {
    let raw = format!("{}/pks/lookup", keyserver.as_str().trim_end_matches('/'));
    let mut url = Url::parse(&raw).map_err(|source| PrimeError::InvalidKeyUrl { url: raw, source })?;
    let bare = key_id
        .strip_prefix("0x")
        .or_else(|| key_id.strip_prefix("0X"))
        .unwrap_or(key_id);
    url.query_pairs_mut()
        .clear()
        .append_pair("op", "get")
        .append_pair("search", &format!("0x{bare}"));
    Ok(url)
}

/// Where the trust store primer gets its inputs from.
#[derive(Clone, Copy)]
pub struct Primer<'a> {
    /// Downloads key material.
    pub fetcher: &'a dyn DocumentFetcher,
    /// Imports key material.
    pub engine: &'a dyn VerificationEngine,
    /// Key server used when no explicit key URL is given.
    pub keyserver: &'a Url,
    /// Directory under which trust stores are created.
    pub scratch_dir: &'a Path,
}

impl Primer<'_> {
    /// Fetch `key_id` (from `key_url`, or the key server) and import it into
    /// a new trust store.
    ///
    /// A failed import aborts priming; verification never runs against a
    /// store that does not hold the requested key.
    ///
    /// # Errors
    ///
    /// Returns [`PrimeError`] if the key identifier is empty, the key cannot
    /// be fetched, the store cannot be created, or the import fails.
    pub async fn prime(&self, key_id: &str, key_url: Option<&str>) -> Result<TrustStore, PrimeError> {
        if key_id.is_empty() {
            return Err(PrimeError::MissingKeyId);
        }

        let source = match key_url.filter(|u| !u.is_empty()) {
            Some(raw) => Url::parse(raw).map_err(|source| PrimeError::InvalidKeyUrl {
                url: raw.to_owned(),
                source,
            })?,
            None => key_source_url(self.keyserver, key_id)?,
        };

        info!("priming trust store with key {key_id} from {source}");
        let key = self.fetcher.fetch(&source).await?;

        let store = TrustStore::create_in(self.scratch_dir).map_err(PrimeError::Scratch)?;
        let report = self.engine.import_key(&store, &key.bytes).await?;
        if !report.success {
            warn!("import of key {key_id} failed: {}", report.output.trim());
            return Err(PrimeError::Import {
                key_id: key_id.to_owned(),
                output: report.output.trim().to_owned(),
            });
        }

        Ok(store)
    }
}
