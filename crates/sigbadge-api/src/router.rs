//! Axum router construction and shared application state.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde::Serialize;
use sigbadge_client::client::{DocumentFetcher, HttpFetcher};
use sigbadge_gpg::engine::{GpgEngine, VerificationEngine};
use sigbadge_gpg::primer::Primer;
use url::Url;

use crate::config::{ApiConfig, ConfigError};
use crate::handlers::verify::verify_handler;

/// Immutable state shared by every request.
pub struct AppState {
    /// Downloads documents, signatures and keys.
    pub fetcher: Arc<dyn DocumentFetcher>,
    /// Imports keys and checks signatures.
    pub engine: Arc<dyn VerificationEngine>,
    /// Key server used when a request gives a key without a key URL.
    pub keyserver: Url,
    /// Root under which per-request scratch directories are created.
    pub scratch_dir: PathBuf,
    /// Badge template source.
    pub badge_template: String,
}

/// State handle passed to handlers.
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Build the production state from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any configured value is invalid.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            fetcher: Arc::new(HttpFetcher::new(config.fetch_timeout()?)?),
            engine: Arc::new(GpgEngine::new(&config.gpg_path, config.engine_timeout()?)),
            keyserver: config.keyserver_url()?,
            scratch_dir: config.scratch_root(),
            badge_template: config.load_badge_template()?,
        })
    }

    /// Trust store primer borrowing this state's collaborators.
    #[must_use]
    pub fn primer(&self) -> Primer<'_> {
        Primer {
            fetcher: self.fetcher.as_ref(),
            engine: self.engine.as_ref(),
            keyserver: &self.keyserver,
            scratch_dir: &self.scratch_dir,
        }
    }
}

/// Response body for the health endpoint.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Build the Axum application router.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/verify", get(verify_handler))
        .with_state(state)
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
