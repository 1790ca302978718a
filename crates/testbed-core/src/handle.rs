//! In-memory record of one provisioned repository

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use testbed_svn::{Credentials, RepositoryConnection};
use url::Url;

/// What a repository's name means to other test runs.
///
/// Decided at creation time; it controls what teardown does with a kept
/// repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamePolicy {
    /// Other runs depend on this exact name. A kept repository is renamed
    /// aside at teardown so the name becomes available again.
    #[default]
    Significant,

    /// Nobody depends on the name. A kept repository stays exactly where
    /// it was created.
    Incidental,
}

/// Handle to one provisioned repository: identity, location, credentials,
/// connection and lifecycle flags.
///
/// Cloning is cheap and every clone observes the same keep flags; the
/// lifecycle registry holds one clone of each handle it will tear down.
/// While the handle exists (and until teardown deletes it), the local path
/// always contains a valid repository.
#[derive(Clone)]
pub struct RepositoryHandle {
    inner: Arc<HandleInner>,
}

struct HandleInner {
    name: String,
    local_path: PathBuf,
    root_url: Url,
    credentials: Credentials,
    connection: Box<dyn RepositoryConnection>,
    keep: AtomicBool,
    rename_at_keep: bool,
}

impl RepositoryHandle {
    pub(crate) fn new(
        name: impl Into<String>,
        local_path: PathBuf,
        root_url: Url,
        credentials: Credentials,
        connection: Box<dyn RepositoryConnection>,
        policy: NamePolicy,
    ) -> Self {
        Self {
            inner: Arc::new(HandleInner {
                name: name.into(),
                local_path,
                root_url,
                credentials,
                connection,
                keep: AtomicBool::new(false),
                rename_at_keep: policy == NamePolicy::Significant,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn local_path(&self) -> &Path {
        &self.inner.local_path
    }

    pub fn url(&self) -> &Url {
        &self.inner.root_url
    }

    pub fn username(&self) -> &str {
        &self.inner.credentials.username
    }

    pub fn password(&self) -> &str {
        &self.inner.credentials.password
    }

    /// The authenticated engine connection, exclusively owned by this
    /// handle.
    pub fn connection(&self) -> &dyn RepositoryConnection {
        self.inner.connection.as_ref()
    }

    /// Mark the repository to survive teardown, for manual inspection.
    pub fn keep(&self) {
        self.set_keep(true);
    }

    pub fn set_keep(&self, keep: bool) {
        self.inner.keep.store(keep, Ordering::Relaxed);
    }

    pub fn is_kept(&self) -> bool {
        self.inner.keep.load(Ordering::Relaxed)
    }

    /// Whether teardown renames this repository aside when it is kept.
    pub fn rename_at_keep(&self) -> bool {
        self.inner.rename_at_keep
    }
}

impl fmt::Debug for RepositoryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepositoryHandle")
            .field("name", &self.inner.name)
            .field("local_path", &self.inner.local_path)
            .field("root_url", &self.inner.root_url.as_str())
            .field("keep", &self.is_kept())
            .field("rename_at_keep", &self.inner.rename_at_keep)
            .finish()
    }
}
