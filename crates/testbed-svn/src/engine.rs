//! Engine contract consumed by the provisioning core

use std::io::Read;
use std::path::Path;

use url::Url;

use crate::Result;

/// Authentication identity for a repository root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Identity and head state of a repository, as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryInfo {
    /// Repository root as the server addresses it
    pub root_url: Url,

    /// Repository UUID
    pub uuid: String,

    /// Youngest revision
    pub head_revision: u64,
}

/// An authenticated connection to one repository.
///
/// Connections are exclusively owned by the repository handle that opened
/// them and are never shared between handles.
pub trait RepositoryConnection {
    /// The URL this connection was opened against
    fn root_url(&self) -> &Url;

    /// Query repository identity and head revision.
    ///
    /// Provisioning uses this as the post-creation validation step: a
    /// repository that cannot answer is treated as never created.
    fn info(&self) -> Result<RepositoryInfo>;

    /// Read a single unversioned revision property, `None` if unset.
    fn revision_property(&self, revision: u64, name: &str) -> Result<Option<String>>;
}

/// Operations the core needs from a Subversion engine.
///
/// Implementations handle the on-disk format and the wire protocol; the
/// core calls exactly these operations and never inspects engine state.
pub trait SvnEngine {
    /// Initialize an empty repository in `path`.
    ///
    /// The directory has already been created (and thereby claimed) by the
    /// caller; the engine populates it.
    fn create_repository(&self, path: &Path) -> Result<()>;

    /// Open an authenticated connection to a repository root URL.
    fn open_connection(
        &self,
        url: &Url,
        credentials: &Credentials,
    ) -> Result<Box<dyn RepositoryConnection>>;

    /// Replay a serialized dump into the repository at `path`.
    fn load_dump(&self, path: &Path, dump: &mut dyn Read) -> Result<()>;
}
