//! Best-effort shared-access widening
//!
//! Test repositories live under a parent directory shared with the HTTP
//! server process, which usually runs as a different user. Widening
//! permissions right after creation lets that process commit into the
//! repository. Every caller in this workspace treats failure here as
//! non-fatal.

use std::path::Path;

#[cfg(unix)]
use crate::Error;
use crate::Result;

/// Recursively grant read/write access to everyone under `root`:
/// directories become `0o777`, files `0o666`.
///
/// On non-Unix platforms this is a no-op.
#[cfg(unix)]
pub fn grant_shared_access(root: &Path) -> Result<()> {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    for entry in walkdir::WalkDir::new(root) {
        let entry = entry.map_err(|e| Error::io(root, e.into()))?;
        let mode = if entry.file_type().is_dir() {
            0o777
        } else {
            0o666
        };
        fs::set_permissions(entry.path(), fs::Permissions::from_mode(mode))
            .map_err(|e| Error::io(entry.path(), e))?;
    }
    tracing::debug!(root = %root.display(), "granted shared access");
    Ok(())
}

#[cfg(not(unix))]
pub fn grant_shared_access(_root: &Path) -> Result<()> {
    Ok(())
}
