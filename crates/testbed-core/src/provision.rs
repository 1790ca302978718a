//! Repository creation and adoption

use std::fs;
use std::io::{ErrorKind, Read};
use std::path::Path;

use testbed_svn::{Credentials, SvnEngine};
use url::Url;

use crate::environment::TestServerEnvironment;
use crate::handle::{NamePolicy, RepositoryHandle};
use crate::{Error, Result};

/// Creates repositories through the engine and wraps them in handles.
pub struct Provisioner {
    engine: Box<dyn SvnEngine>,
}

impl Provisioner {
    pub fn new(engine: Box<dyn SvnEngine>) -> Self {
        Self { engine }
    }

    /// Create a repository named `name` under the resolved environment.
    ///
    /// The directory is claimed with an atomic exclusive create, so two
    /// provisioners racing on the same name cannot both succeed; the loser
    /// gets [`Error::NameCollision`] and must pick another name or clean up
    /// by hand. After the engine initializes the repository, shared-access
    /// widening is attempted (non-fatal) and the new connection is
    /// validated by querying repository info.
    pub fn create(
        &self,
        environment: &TestServerEnvironment,
        credentials: &Credentials,
        name: &str,
        policy: NamePolicy,
    ) -> Result<RepositoryHandle> {
        let local_path = environment.local_parent_path.join(name);
        let url = join_name(&environment.http_parent_url, name)?;

        match fs::create_dir(&local_path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(Error::NameCollision {
                    name: name.to_string(),
                    path: local_path,
                });
            }
            Err(e) => {
                return Err(Error::Claim {
                    path: local_path,
                    source: e,
                });
            }
        }

        self.engine.create_repository(&local_path)?;

        if let Err(e) = testbed_fs::grant_shared_access(&local_path) {
            tracing::warn!(
                path = %local_path.display(),
                error = %e,
                "failed to widen repository permissions"
            );
        }

        let connection = self.engine.open_connection(&url, credentials)?;
        let info = connection.info()?;
        tracing::debug!(
            name,
            uuid = %info.uuid,
            revision = info.head_revision,
            "created test repository"
        );

        Ok(RepositoryHandle::new(
            name,
            local_path,
            url,
            credentials.clone(),
            connection,
            policy,
        ))
    }

    /// Adopt a repository that already exists at `path` / `url`, without
    /// creating anything. The connection is opened and validated the same
    /// way as for a created repository.
    pub fn connect(
        &self,
        path: &Path,
        url: Url,
        credentials: &Credentials,
    ) -> Result<RepositoryHandle> {
        let name = repository_name(path, &url);
        let connection = self.engine.open_connection(&url, credentials)?;
        let info = connection.info()?;
        tracing::debug!(
            name = %name,
            uuid = %info.uuid,
            revision = info.head_revision,
            "adopted existing repository"
        );

        Ok(RepositoryHandle::new(
            name,
            path.to_path_buf(),
            url,
            credentials.clone(),
            connection,
            NamePolicy::Incidental,
        ))
    }

    /// Replay a serialized dump into the repository behind `handle`.
    ///
    /// Failures surface unmodified: a broken dump is a setup bug that needs
    /// a human, not a retry.
    pub fn load(&self, handle: &RepositoryHandle, dump: &mut dyn Read) -> Result<()> {
        self.engine
            .load_dump(handle.local_path(), dump)
            .map_err(|e| Error::Load {
                name: handle.name().to_string(),
                source: e,
            })
    }
}

fn join_name(parent_url: &Url, name: &str) -> Result<Url> {
    parent_url.join(name).map_err(|e| Error::InvalidUrl {
        url: format!("{parent_url}{name}"),
        message: e.to_string(),
    })
}

fn repository_name(path: &Path, url: &Url) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| {
            url.path_segments()
                .and_then(|mut segments| segments.next_back())
                .unwrap_or("adopted")
                .to_string()
        })
}
