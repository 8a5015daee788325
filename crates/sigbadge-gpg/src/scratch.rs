//! Request-scoped scratch directories and private file writes.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use tempfile::TempDir;

/// Create a uniquely named directory under `root`, removed when dropped.
///
/// On Unix the directory is only accessible to the owning user.
///
/// # Errors
///
/// Returns the underlying I/O error if the directory cannot be created.
pub fn scratch_dir(root: &Path, prefix: &str) -> io::Result<TempDir> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(prefix);
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o700));
    }
    builder.tempdir_in(root)
}

/// Write `bytes` to a new file at `path`, readable only by the owner on Unix.
///
/// # Errors
///
/// Fails if `path` already exists or cannot be written.
pub fn write_private(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(bytes)?;
    file.flush()
}
