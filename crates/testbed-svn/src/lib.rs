//! Subversion engine abstraction for svn-testbed
//!
//! The provisioning core never speaks the SVN wire protocol or touches the
//! on-disk repository format itself; it consumes the narrow [`SvnEngine`]
//! and [`RepositoryConnection`] contracts defined here. The default
//! implementation drives the `svnadmin` and `svn` binaries.

pub mod command;
pub mod engine;
pub mod error;

pub use command::{CommandConnection, CommandEngine};
pub use engine::{Credentials, RepositoryConnection, RepositoryInfo, SvnEngine};
pub use error::{Error, Result};
