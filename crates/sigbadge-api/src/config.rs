//! Server configuration from command-line flags and environment variables.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use sigbadge_client::error::FetchError;
use thiserror::Error;
use url::Url;

use crate::badge::DEFAULT_TEMPLATE;

/// Errors during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The key server is not an absolute URL.
    #[error("invalid key server url '{url}': {source}")]
    InvalidKeyserver {
        /// The rejected value.
        url: String,
        /// Parse failure.
        #[source]
        source: url::ParseError,
    },
    /// A timeout was configured as zero seconds.
    #[error("{0} must be at least one second")]
    ZeroTimeout(&'static str),
    /// The badge template file could not be read.
    #[error("reading badge template {path}: {source}")]
    Template {
        /// Configured template path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The HTTP client could not be built.
    #[error(transparent)]
    Client(#[from] FetchError),
}

/// Badge server runtime configuration. Read once at startup.
#[derive(Debug, Clone, Parser)]
#[command(name = "sigbadge", version, about = "Serve detached-signature verification badges")]
pub struct ApiConfig {
    /// TCP address to bind.
    #[arg(long, env = "SIGBADGE_LISTEN", default_value = "0.0.0.0:3000")]
    pub listen: String,
    /// GnuPG binary used for key import and verification.
    #[arg(long, env = "SIGBADGE_GPG_PATH", default_value = "/usr/bin/gpg")]
    pub gpg_path: PathBuf,
    /// Key server queried when a request names a key without a key URL.
    #[arg(long, env = "SIGBADGE_KEYSERVER", default_value = "https://keyserver.ubuntu.com")]
    pub keyserver: String,
    /// Upper bound for each document, signature and key download.
    #[arg(long, env = "SIGBADGE_FETCH_TIMEOUT_SECS", default_value_t = 15)]
    pub fetch_timeout_secs: u64,
    /// Upper bound for each GnuPG invocation.
    #[arg(long, env = "SIGBADGE_ENGINE_TIMEOUT_SECS", default_value_t = 30)]
    pub engine_timeout_secs: u64,
    /// Directory for per-request keyrings and verification files.
    #[arg(long, env = "SIGBADGE_SCRATCH_DIR")]
    pub scratch_dir: Option<PathBuf>,
    /// SVG template replacing the built-in badge.
    #[arg(long, env = "SIGBADGE_BADGE_TEMPLATE")]
    pub badge_template: Option<PathBuf>,
}

impl ApiConfig {
    /// Parsed key server URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidKeyserver`] if the value does not parse.
    pub fn keyserver_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.keyserver).map_err(|source| ConfigError::InvalidKeyserver {
            url: self.keyserver.clone(),
            source,
        })
    }

    /// Download timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTimeout`] if configured as zero.
    pub fn fetch_timeout(&self) -> Result<Duration, ConfigError> {
        non_zero(self.fetch_timeout_secs, "fetch timeout")
    }

    /// GnuPG invocation timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTimeout`] if configured as zero.
    pub fn engine_timeout(&self) -> Result<Duration, ConfigError> {
        non_zero(self.engine_timeout_secs, "engine timeout")
    }

    /// Root for scratch directories, defaulting to the system temp dir.
    #[must_use]
    pub fn scratch_root(&self) -> PathBuf {
        self.scratch_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Badge template source: the configured file, or the built-in SVG.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Template`] if the configured file cannot be read.
    pub fn load_badge_template(&self) -> Result<String, ConfigError> {
        match &self.badge_template {
            Some(path) => std::fs::read_to_string(path).map_err(|source| ConfigError::Template {
                path: path.display().to_string(),
                source,
            }),
            None => Ok(DEFAULT_TEMPLATE.to_owned()),
        }
    }
}

fn non_zero(secs: u64, what: &'static str) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::ZeroTimeout(what));
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ApiConfig {
        ApiConfig::try_parse_from(std::iter::once("sigbadge").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn flags_override_defaults() {
        let cfg = parse(&[
            "--listen",
            "127.0.0.1:9000",
            "--gpg-path",
            "/opt/gpg",
            "--engine-timeout-secs",
            "5",
        ]);
        assert_eq!(cfg.listen, "127.0.0.1:9000");
        assert_eq!(cfg.gpg_path, PathBuf::from("/opt/gpg"));
        assert_eq!(cfg.engine_timeout().unwrap(), Duration::from_secs(5));
    }

    #[test]
    fn invalid_keyserver_is_rejected() {
        let cfg = parse(&["--keyserver", "not a url"]);
        assert!(matches!(
            cfg.keyserver_url(),
            Err(ConfigError::InvalidKeyserver { .. })
        ));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let cfg = parse(&["--fetch-timeout-secs", "0"]);
        let err = cfg.fetch_timeout().unwrap_err();
        assert_eq!(err.to_string(), "fetch timeout must be at least one second");
    }

    #[test]
    fn builtin_template_is_default() {
        let cfg = parse(&["--keyserver", "https://keys.example.com"]);
        assert_eq!(cfg.load_badge_template().unwrap(), DEFAULT_TEMPLATE);
    }

    #[test]
    fn missing_template_file_is_reported() {
        let cfg = parse(&["--badge-template", "/nonexistent/badge.svg"]);
        assert!(matches!(
            cfg.load_badge_template(),
            Err(ConfigError::Template { .. })
        ));
    }
}
