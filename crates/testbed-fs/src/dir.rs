//! Directory operations used by repository provisioning and teardown

use std::fs;
use std::path::Path;

use crate::{Error, Result};

/// Check whether `path` is an existing directory the current process can
/// write into.
///
/// Writability is established by actually creating (and immediately
/// dropping) an unnamed probe file in the directory, not by inspecting
/// permission bits. Permission metadata lies on network mounts and for
/// privileged processes; a real write does not.
pub fn is_writable_dir(path: &Path) -> bool {
    path.is_dir() && tempfile::tempfile_in(path).is_ok()
}

/// Delete a directory tree recursively.
///
/// The path must exist. Callers that treat a missing tree as already-deleted
/// should check existence first.
pub fn remove_tree(path: &Path) -> Result<()> {
    tracing::debug!(path = %path.display(), "removing directory tree");
    fs::remove_dir_all(path).map_err(|e| Error::io(path, e))
}

/// Rename a directory. Both paths must be on the same filesystem.
pub fn rename_dir(from: &Path, to: &Path) -> Result<()> {
    tracing::debug!(from = %from.display(), to = %to.display(), "renaming directory");
    fs::rename(from, to).map_err(|e| Error::Rename {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source: e,
    })
}
