//! Test server environment discovery

use std::path::PathBuf;

use testbed_svn::Credentials;
use url::Url;

use crate::config::EnvironmentConfig;
use crate::probe::{ProbeClient, ProbeError};
use crate::{Error, Result};

/// A resolved test server: where repositories live on disk and where the
/// server publishes them.
#[derive(Debug, Clone)]
pub struct TestServerEnvironment {
    /// Local directory new repositories are created under
    pub local_parent_path: PathBuf,

    /// Public URL root, always with a trailing slash
    pub http_parent_url: Url,
}

/// Discovers the server root among ordered candidates and caches the
/// result for its lifetime.
///
/// One locator lives inside each [`TestbedSession`](crate::TestbedSession),
/// so resolution happens at most once per test run and never re-probes.
pub struct EnvironmentLocator {
    config: EnvironmentConfig,
    probe: Box<dyn ProbeClient>,
    local_parent: Option<PathBuf>,
    http_parent: Option<Url>,
}

impl EnvironmentLocator {
    pub fn new(config: EnvironmentConfig, probe: Box<dyn ProbeClient>) -> Self {
        Self {
            config,
            probe,
            local_parent: None,
            http_parent: None,
        }
    }

    /// Both halves of the environment, resolved and cached.
    pub fn environment(&mut self) -> Result<TestServerEnvironment> {
        Ok(TestServerEnvironment {
            local_parent_path: self.local_parent_path()?,
            http_parent_url: self.http_parent_url()?,
        })
    }

    /// First candidate path that exists, is a directory and is writable.
    pub fn local_parent_path(&mut self) -> Result<PathBuf> {
        if let Some(ref path) = self.local_parent {
            return Ok(path.clone());
        }
        let found = self.try_parent_paths()?;
        tracing::info!(path = %found.display(), "resolved repository parent path");
        self.local_parent = Some(found.clone());
        Ok(found)
    }

    /// First candidate URL whose probe answers 200 or 401, normalized with
    /// a trailing slash.
    ///
    /// 401 counts as success because the root may require authentication.
    /// A refused connection means "no server here" and the next candidate
    /// is tried; any other transport failure aborts discovery.
    pub fn http_parent_url(&mut self) -> Result<Url> {
        if let Some(ref url) = self.http_parent {
            return Ok(url.clone());
        }
        let found = self.try_parent_urls()?;
        tracing::info!(url = %found, "resolved repository parent URL");
        self.http_parent = Some(found.clone());
        Ok(found)
    }

    /// Identity used against `root_url`.
    ///
    /// Currently a fixed test identity; takes the root so a per-root lookup
    /// can be introduced without changing callers.
    pub fn credentials(&self, _root_url: &Url) -> Credentials {
        Credentials::new("test", "test")
    }

    fn try_parent_paths(&self) -> Result<PathBuf> {
        for candidate in &self.config.parent_paths {
            if testbed_fs::is_writable_dir(candidate) {
                return Ok(candidate.clone());
            }
            tracing::debug!(path = %candidate.display(), "rejecting parent path candidate");
        }
        Err(Error::ParentPathNotFound {
            tried: display_paths(&self.config.parent_paths),
        })
    }

    fn try_parent_urls(&self) -> Result<Url> {
        for candidate in &self.config.parent_urls {
            let url = Url::parse(candidate).map_err(|e| Error::InvalidUrl {
                url: candidate.clone(),
                message: e.to_string(),
            })?;
            match self.probe.probe(&url) {
                Ok(response) if matches!(response.status, 200 | 401) => {
                    tracing::debug!(
                        url = %url,
                        status = response.status,
                        content_type = response.content_type.as_deref().unwrap_or(""),
                        "accepted parent URL candidate"
                    );
                    return Ok(with_trailing_slash(url));
                }
                Ok(response) => {
                    tracing::debug!(
                        url = %url,
                        status = response.status,
                        "rejecting parent URL candidate due to status"
                    );
                }
                Err(ProbeError::Refused) => {
                    tracing::debug!(url = %url, "rejecting parent URL candidate, connection refused");
                }
                Err(source) => {
                    return Err(Error::Probe { url, source });
                }
            }
        }
        Err(Error::ParentUrlNotFound {
            tried: self.config.parent_urls.clone(),
        })
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn display_paths(paths: &[PathBuf]) -> Vec<String> {
    paths.iter().map(|p| p.display().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_trailing_slash_appends_once() {
        let url = Url::parse("http://localhost/svn").unwrap();
        assert_eq!(with_trailing_slash(url).as_str(), "http://localhost/svn/");

        let url = Url::parse("http://localhost/svn/").unwrap();
        assert_eq!(with_trailing_slash(url).as_str(), "http://localhost/svn/");
    }
}
