//! The verification engine seam and its GnuPG command-line adapter.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use log::{debug, warn};
use sigbadge_client::client::BoxFuture;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::error::EngineError;
use crate::trust_store::TrustStore;

/// What the engine printed and how it exited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineReport {
    /// Whether the engine exited with status zero.
    pub success: bool,
    /// Exit code, if the process was not killed by a signal.
    pub code: Option<i32>,
    /// Standard output followed by standard error.
    pub output: String,
}

/// Performs key import and detached signature verification.
pub trait VerificationEngine: Send + Sync {
    /// Import `key` into `store`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the engine could not be run to completion.
    /// A completed run that rejected the key is reported through
    /// [`EngineReport::success`].
    fn import_key<'a>(
        &'a self,
        store: &'a TrustStore,
        key: &'a [u8],
    ) -> BoxFuture<'a, Result<EngineReport, EngineError>>;

    /// Check `signature` over `document`, using `store` when one was primed
    /// and the engine's default keyring otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the engine could not be run to completion.
    fn verify_detached<'a>(
        &'a self,
        store: Option<&'a TrustStore>,
        signature: &'a Path,
        document: &'a Path,
    ) -> BoxFuture<'a, Result<EngineReport, EngineError>>;
}

/// Runs the `gpg` binary.
#[derive(Debug, Clone)]
pub struct GpgEngine {
    binary: PathBuf,
    timeout: Duration,
}

impl GpgEngine {
    /// Create an adapter for the binary at `binary`, killing any invocation
    /// that runs longer than `timeout`.
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    async fn run(&self, args: Vec<OsString>, input: Option<&[u8]>) -> Result<EngineReport, EngineError> {
        debug!("running {} {:?}", self.binary.display(), args);

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(if input.is_some() { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| EngineError::Spawn {
                binary: self.binary.display().to_string(),
                source,
            })?;

        let pipe = child.stdin.take();
        let exchange = async move {
            let feed = async move {
                if let (Some(mut pipe), Some(bytes)) = (pipe, input) {
                    pipe.write_all(bytes).await?;
                }
                Ok::<(), std::io::Error>(())
            };
            let (fed, output) = tokio::join!(feed, child.wait_with_output());
            if let Err(e) = fed {
                warn!("engine closed stdin early: {e}");
            }
            output
        };

        let output = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| EngineError::Timeout(self.timeout))??;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(EngineReport {
            success: output.status.success(),
            code: output.status.code(),
            output: text,
        })
    }
}

impl VerificationEngine for GpgEngine {
    fn import_key<'a>(
        &'a self,
        store: &'a TrustStore,
        key: &'a [u8],
    ) -> BoxFuture<'a, Result<EngineReport, EngineError>> {
        Box::pin(self.run(import_args(store), Some(key)))
    }

    fn verify_detached<'a>(
        &'a self,
        store: Option<&'a TrustStore>,
        signature: &'a Path,
        document: &'a Path,
    ) -> BoxFuture<'a, Result<EngineReport, EngineError>> {
        Box::pin(self.run(verify_args(store, signature, document), None))
    }
}

fn keyring_args(store: &TrustStore) -> Vec<OsString> {
    vec![
        "--homedir".into(),
        store.home().into(),
        "--no-default-keyring".into(),
        "--keyring".into(),
        store.keyring().into(),
    ]
}

/// Arguments for importing a key from stdin into `store`.
#[must_use]
pub fn import_args(store: &TrustStore) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["--batch".into()];
    args.extend(keyring_args(store));
    args.push("--no-auto-key-retrieve".into());
    args.push("--import".into());
    args
}

/// Arguments for checking a detached signature.
#[must_use]
pub fn verify_args(store: Option<&TrustStore>, signature: &Path, document: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["--batch".into()];
    if let Some(store) = store {
        args.extend(keyring_args(store));
    }
    args.push("--no-auto-key-retrieve".into());
    args.push("--verify".into());
    args.push(signature.into());
    args.push(document.into());
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_targets_store_keyring() {
        let root = tempfile::tempdir().unwrap();
        let store = TrustStore::create_in(root.path()).unwrap();
        let args = import_args(&store);

        let keyring_at = args.iter().position(|a| a == "--keyring").unwrap();
        assert_eq!(args[keyring_at + 1], OsString::from(store.keyring()));
        assert!(args.contains(&OsString::from("--no-default-keyring")));
        assert!(args.contains(&OsString::from("--no-auto-key-retrieve")));
        assert_eq!(args.last().unwrap(), "--import");
    }

    #[test]
    fn verify_without_store_uses_default_keyring() {
        let args = verify_args(None, Path::new("/s/document.asc"), Path::new("/s/document"));
        assert!(!args.contains(&OsString::from("--keyring")));
        assert!(args.contains(&OsString::from("--no-auto-key-retrieve")));
        let n = args.len();
        assert_eq!(args[n - 3], "--verify");
        assert_eq!(args[n - 2], "/s/document.asc");
        assert_eq!(args[n - 1], "/s/document");
    }

    #[test]
    fn verify_with_store_points_at_its_home() {
        let root = tempfile::tempdir().unwrap();
        let store = TrustStore::create_in(root.path()).unwrap();
        let args = verify_args(Some(&store), Path::new("sig"), Path::new("doc"));
        let home_at = args.iter().position(|a| a == "--homedir").unwrap();
        assert_eq!(args[home_at + 1], OsString::from(store.home()));
    }
}
