//! Request-scoped keyrings.

use std::io;
use std::path::Path;

use tempfile::TempDir;

use crate::scratch::{scratch_dir, write_private};

/// File name of the keyring inside a trust store directory.
pub const KEYRING_FILE: &str = "pubring.gpg";

const TRUST_STORE_PREFIX: &str = "sigbadge-keyring-";

/// An isolated keyring living in its own temporary directory.
///
/// The directory and everything the engine wrote into it are deleted when the
/// store is dropped.
#[derive(Debug)]
pub struct TrustStore {
    dir: TempDir,
}

impl TrustStore {
    /// Create an empty trust store under `root`.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the directory or keyring file cannot be created.
    pub fn create_in(root: &Path) -> io::Result<Self> {
        let dir = scratch_dir(root, TRUST_STORE_PREFIX)?;
        write_private(&dir.path().join(KEYRING_FILE), &[])?;
        Ok(Self { dir })
    }

    /// Directory used as the engine's home while operating on this store.
    #[must_use]
    pub fn home(&self) -> &Path {
        self.dir.path()
    }

    /// Path of the keyring file.
    #[must_use]
    pub fn keyring(&self) -> std::path::PathBuf {
        self.dir.path().join(KEYRING_FILE)
    }
}
