//! Error types for testbed-core

use std::path::PathBuf;

use url::Url;

use crate::probe::ProbeError;

/// Result type for testbed-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in testbed-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No candidate parent path exists, is a directory and is writable
    #[error("no usable repository parent path among candidates: {}", .tried.join(", "))]
    ParentPathNotFound { tried: Vec<String> },

    /// No candidate parent URL answered a probe with 200 or 401
    #[error("no repository parent URL answered among candidates: {}", .tried.join(", "))]
    ParentUrlNotFound { tried: Vec<String> },

    /// A probe failed with a transport error other than "connection refused"
    #[error("probe of {url} failed: {source}")]
    Probe {
        url: Url,
        #[source]
        source: ProbeError,
    },

    /// The probe client itself could not be constructed
    #[error("probe client initialization failed: {message}")]
    ProbeInit { message: String },

    /// Target name already taken under the parent path. Never retried: a
    /// collision usually means stale state from a crashed prior run, which
    /// must not be silently masked.
    #[error("repository name '{name}' already in use at {path}")]
    NameCollision { name: String, path: PathBuf },

    /// Claiming the repository directory failed for a reason other than
    /// the name being taken
    #[error("failed to claim repository directory {path}: {source}")]
    Claim {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A candidate or computed URL is not valid
    #[error("invalid repository URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// Dump replay failed; dump corruption is a setup bug, never retried
    #[error("failed to load dump into repository '{name}': {source}")]
    Load {
        name: String,
        #[source]
        source: testbed_svn::Error,
    },

    /// A non-kept repository could not be deleted at teardown
    #[error("failed to delete test repository '{name}' at {path}: {source}")]
    Teardown {
        name: String,
        path: PathBuf,
        #[source]
        source: testbed_fs::Error,
    },

    /// Config file could not be read
    #[error("failed to read config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file could not be parsed
    #[error("failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Engine error from testbed-svn
    #[error(transparent)]
    Engine(#[from] testbed_svn::Error),
}
