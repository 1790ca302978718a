//! Repository provisioning and lifecycle core for svn-testbed
//!
//! Provisions short-lived, isolated Subversion repositories for automated
//! tests running against a shared test server, and reclaims them afterwards:
//!
//! - **Environment discovery**: find a usable server root (local parent
//!   directory + public URL root) among ordered candidate lists, once per
//!   session.
//! - **Provisioning**: collision-safe repository creation and naming,
//!   shared-access widening, authenticated connections.
//! - **Teardown policy**: delete, keep, or keep-with-rename each repository
//!   at session end.
//!
//! The Subversion engine, the HTTP probe and the filesystem primitives are
//! collaborators behind narrow contracts (`testbed-svn`, [`probe`],
//! `testbed-fs`); this crate owns neither the wire protocol nor the on-disk
//! repository format.
//!
//! # Example
//!
//! ```no_run
//! use testbed_core::{RepositoryConnection, Result, TestbedSession};
//!
//! fn run() -> Result<()> {
//!     let mut session = TestbedSession::new("basic_ops")?;
//!     let repo = session.repository()?;
//!     assert_eq!(repo.connection().info()?.head_revision, 0);
//!     session.tear_down()?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod environment;
pub mod error;
pub mod handle;
pub mod naming;
pub mod probe;
pub mod provision;
pub mod registry;
pub mod session;

pub use config::EnvironmentConfig;
pub use environment::{EnvironmentLocator, TestServerEnvironment};
pub use error::{Error, Result};
pub use handle::{NamePolicy, RepositoryHandle};
pub use probe::{HttpProbe, ProbeClient, ProbeError, ProbeResponse};
pub use provision::Provisioner;
pub use registry::{KeptRepository, LifecycleRegistry, TeardownSummary};
pub use session::TestbedSession;

// The engine contract travels with the core so callers need only one
// import to drive connections.
pub use testbed_svn::{Credentials, RepositoryConnection, RepositoryInfo, SvnEngine};
