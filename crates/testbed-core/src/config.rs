//! Candidate lists for environment discovery

use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Error, Result};

/// Parent paths tried in order when no override is given.
pub const DEFAULT_PARENT_PATHS: &[&str] = &["/home/cmsadmin/svn"];

/// Parent URLs tried in order when no override is given.
pub const DEFAULT_PARENT_URLS: &[&str] = &["http://localhost/svn/", "http://localdev:8530/svn/"];

/// Env var holding comma-separated parent path candidates.
pub const PARENT_PATHS_VAR: &str = "SVN_TESTBED_PARENT_PATHS";

/// Env var holding comma-separated parent URL candidates.
pub const PARENT_URLS_VAR: &str = "SVN_TESTBED_PARENT_URLS";

/// Ordered candidate lists for locating the test server.
///
/// Candidates are tried in declared order; the first usable one wins.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvironmentConfig {
    /// Filesystem paths that may be the server's repository parent
    pub parent_paths: Vec<PathBuf>,

    /// URLs that may be the server's public repository root
    pub parent_urls: Vec<String>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            parent_paths: DEFAULT_PARENT_PATHS.iter().map(PathBuf::from).collect(),
            parent_urls: DEFAULT_PARENT_URLS.iter().map(|u| u.to_string()).collect(),
        }
    }
}

impl EnvironmentConfig {
    /// Build from the environment, falling back to the compiled-in defaults
    /// per field. `SVN_TESTBED_PARENT_PATHS` and `SVN_TESTBED_PARENT_URLS`
    /// hold comma-separated candidate lists.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            parent_paths: list_var(PARENT_PATHS_VAR)
                .map(|items| items.into_iter().map(PathBuf::from).collect())
                .unwrap_or(defaults.parent_paths),
            parent_urls: list_var(PARENT_URLS_VAR).unwrap_or(defaults.parent_urls),
        }
    }

    /// Load candidate lists from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&raw).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

fn list_var(name: &str) -> Option<Vec<String>> {
    let raw = env::var(name).ok()?;
    let items: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if items.is_empty() { None } else { Some(items) }
}
