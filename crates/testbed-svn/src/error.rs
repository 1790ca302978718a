//! Error types for testbed-svn

use std::path::PathBuf;
use std::process::ExitStatus;

/// Result type for testbed-svn operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in testbed-svn operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("failed to stream dump into {program}: {source}")]
    DumpStream {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed dump stream: {message}")]
    MalformedDump { message: String },

    #[error("unexpected output from {program}: {message}")]
    UnexpectedOutput { program: String, message: String },

    #[error("repository not found for {url}")]
    RepositoryNotFound { url: String },

    #[error("repository already initialized at {path}")]
    RepositoryExists { path: PathBuf },
}
