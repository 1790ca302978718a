//! Process-scoped lifecycle registry and teardown policy

use std::path::PathBuf;

use url::Url;

use crate::handle::RepositoryHandle;
use crate::naming;
use crate::{Error, Result};

/// A repository that survived teardown, with the location it survived at.
#[derive(Debug, Clone)]
pub struct KeptRepository {
    pub name: String,
    pub local_path: PathBuf,
    pub url: Url,
}

/// What teardown did with each registered handle.
#[derive(Debug, Clone, Default)]
pub struct TeardownSummary {
    /// Repositories retained, renamed or not, in creation order
    pub kept: Vec<KeptRepository>,

    /// Names of repositories deleted, in creation order
    pub deleted: Vec<String>,
}

/// Insertion-ordered collection of every handle provisioned in a session.
///
/// Append-only until [`tear_down`](Self::tear_down), which applies the
/// keep/rename/delete policy to each handle exactly once and always leaves
/// the registry empty.
#[derive(Default)]
pub struct LifecycleRegistry {
    handles: Vec<RepositoryHandle>,
}

impl LifecycleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handle: RepositoryHandle) {
        self.handles.push(handle);
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Apply the teardown policy to every registered handle in creation
    /// order:
    ///
    /// - not kept: the local tree is deleted. A failed delete is fatal (a
    ///   dirty shared namespace corrupts later runs) but the remaining
    ///   handles are still processed before the first error is returned.
    /// - kept with rename-at-keep: the directory moves to a fresh
    ///   timestamped name, freeing the original. A failed rename is only
    ///   logged; the repository stays put under its original name.
    /// - kept otherwise: left untouched.
    ///
    /// The registry is empty when this returns, error or not.
    pub fn tear_down(&mut self) -> Result<TeardownSummary> {
        let mut summary = TeardownSummary::default();
        let mut first_error = None;

        for handle in self.handles.drain(..) {
            if handle.is_kept() {
                summary.kept.push(keep(&handle));
            } else {
                match testbed_fs::remove_tree(handle.local_path()) {
                    Ok(()) => summary.deleted.push(handle.name().to_string()),
                    Err(e) => {
                        tracing::error!(
                            name = handle.name(),
                            path = %handle.local_path().display(),
                            error = %e,
                            "failed to delete test repository"
                        );
                        if first_error.is_none() {
                            first_error = Some(Error::Teardown {
                                name: handle.name().to_string(),
                                path: handle.local_path().to_path_buf(),
                                source: e,
                            });
                        }
                    }
                }
            }
        }

        match first_error {
            Some(error) => Err(error),
            None => Ok(summary),
        }
    }
}

/// Retain one kept handle, renaming it aside if its name is significant.
fn keep(handle: &RepositoryHandle) -> KeptRepository {
    let mut kept = KeptRepository {
        name: handle.name().to_string(),
        local_path: handle.local_path().to_path_buf(),
        url: handle.url().clone(),
    };

    if handle.rename_at_keep() {
        let renamed = naming::rename_target(handle.name());
        let target = handle.local_path().with_file_name(&renamed);
        match testbed_fs::rename_dir(handle.local_path(), &target) {
            Ok(()) => {
                kept.name = renamed.clone();
                kept.local_path = target;
                kept.url = renamed_url(handle.url(), &renamed);
            }
            Err(e) => {
                // Accepted risk: the name may collide with the next run.
                tracing::warn!(
                    name = handle.name(),
                    error = %e,
                    "failed to rename kept repository, leaving it in place"
                );
            }
        }
    }

    tracing::info!(
        name = %kept.name,
        path = %format!("file://{}", kept.local_path.display()),
        url = %kept.url,
        "test repository kept"
    );
    kept
}

/// Swap the last path segment of a repository URL for the renamed name.
fn renamed_url(url: &Url, new_name: &str) -> Url {
    let mut renamed = url.clone();
    if let Ok(mut segments) = renamed.path_segments_mut() {
        segments.pop();
        segments.push(new_name);
    }
    renamed
}
