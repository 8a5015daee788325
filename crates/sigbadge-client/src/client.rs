//! Document fetcher trait and `reqwest`-backed implementation.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use log::debug;
use sigbadge_core::types::RetrievedArtifact;
use url::Url;

use crate::error::FetchError;

/// Boxed future returned by dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Retrieves raw bytes from absolute HTTP(S) URLs.
pub trait DocumentFetcher: Send + Sync {
    /// Issue a single GET for `url` and return the full body.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on any transport failure or non-2xx status.
    fn fetch<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<RetrievedArtifact, FetchError>>;
}

/// `reqwest`-backed implementation of [`DocumentFetcher`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher whose requests are bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the TLS backend cannot be initialised.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("sigbadge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { http })
    }
}

impl DocumentFetcher for HttpFetcher {
    fn fetch<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<RetrievedArtifact, FetchError>> {
        Box::pin(async move {
            debug!("fetching {url}");

            let response = self
                .http
                .get(url.clone())
                .send()
                .await
                .map_err(|e| FetchError::from_reqwest(url.as_str(), e))?;

            // Dropping the response on this path releases the connection.
            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }

            let bytes = response
                .bytes()
                .await
                .map_err(|e| FetchError::from_reqwest(url.as_str(), e))?;
            debug!("fetched {} bytes from {url}", bytes.len());

            Ok(RetrievedArtifact::new(url.clone(), bytes.to_vec()))
        })
    }
}
