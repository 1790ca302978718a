//! Filesystem primitives for the svn-testbed workspace
//!
//! Narrow operations the repository lifecycle needs from the local
//! filesystem: writability probing, recursive deletion, directory rename
//! and shared-access widening.

pub mod dir;
pub mod error;
pub mod share;

pub use dir::{is_writable_dir, remove_tree, rename_dir};
pub use error::{Error, Result};
pub use share::grant_shared_access;
