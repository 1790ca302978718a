//! Session facade tying discovery, provisioning and teardown together

use std::io::Read;
use std::path::{Path, PathBuf};

use testbed_svn::{CommandEngine, SvnEngine};
use url::Url;

use crate::config::EnvironmentConfig;
use crate::environment::{EnvironmentLocator, TestServerEnvironment};
use crate::handle::{NamePolicy, RepositoryHandle};
use crate::probe::{HttpProbe, ProbeClient};
use crate::provision::Provisioner;
use crate::registry::{LifecycleRegistry, TeardownSummary};
use crate::{Error, Result, naming};

/// One provisioning session per test run.
///
/// Construct it in fixture setup with a label identifying the test module
/// (the label becomes part of every generated repository name), thread it
/// through the tests, and finish with [`tear_down`](Self::tear_down).
/// There is deliberately no global instance; a session owns its registry.
///
/// Sessions are single-threaded by design: every mutating operation takes
/// `&mut self`, matching the sequential test execution the registry
/// assumes.
pub struct TestbedSession {
    label: String,
    locator: EnvironmentLocator,
    provisioner: Provisioner,
    registry: LifecycleRegistry,
}

impl TestbedSession {
    /// Session against a real server: candidate lists from the environment
    /// (or compiled-in defaults), HTTP HEAD probes, `svnadmin`/`svn`
    /// engine.
    pub fn new(label: &str) -> Result<Self> {
        let probe = HttpProbe::new().map_err(|e| Error::ProbeInit {
            message: e.to_string(),
        })?;
        Ok(Self::with_collaborators(
            label,
            EnvironmentConfig::from_env(),
            Box::new(probe),
            Box::new(CommandEngine::default()),
        ))
    }

    /// Session with explicit collaborators, for wiring in fakes or
    /// alternative engines.
    pub fn with_collaborators(
        label: &str,
        config: EnvironmentConfig,
        probe: Box<dyn ProbeClient>,
        engine: Box<dyn SvnEngine>,
    ) -> Self {
        Self {
            label: label.to_string(),
            locator: EnvironmentLocator::new(config, probe),
            provisioner: Provisioner::new(engine),
            registry: LifecycleRegistry::new(),
        }
    }

    /// Create a repository with a generated name.
    pub fn repository(&mut self) -> Result<RepositoryHandle> {
        let name = naming::generate(&self.label);
        self.create(&name, NamePolicy::Incidental)
    }

    /// Create a repository with an explicit name other runs may depend on:
    /// if kept at teardown it is renamed aside so the name frees up.
    pub fn repository_named(&mut self, name: &str) -> Result<RepositoryHandle> {
        self.create(name, NamePolicy::Significant)
    }

    /// Create a repository with an explicit name and explicit control over
    /// the rename-at-keep policy.
    pub fn repository_with_policy(
        &mut self,
        name: &str,
        policy: NamePolicy,
    ) -> Result<RepositoryHandle> {
        self.create(name, policy)
    }

    /// Create a repository with a generated name and seed it from a dump.
    pub fn repository_from_dump(&mut self, dump: &mut dyn Read) -> Result<RepositoryHandle> {
        let handle = self.repository()?;
        self.load(&handle, dump)?;
        Ok(handle)
    }

    /// Replay a serialized dump into an existing repository.
    pub fn load(&self, handle: &RepositoryHandle, dump: &mut dyn Read) -> Result<()> {
        self.provisioner.load(handle, dump)
    }

    /// Adopt a repository provisioned out-of-band.
    ///
    /// The handle registers as kept, so teardown reports it but never
    /// deletes state this session did not create; call
    /// [`set_keep(false)`](RepositoryHandle::set_keep) to opt into
    /// deletion.
    pub fn connect(&mut self, path: &Path, url: Url) -> Result<RepositoryHandle> {
        let credentials = self.locator.credentials(&url);
        let handle = self.provisioner.connect(path, url, &credentials)?;
        handle.keep();
        self.registry.register(handle.clone());
        Ok(handle)
    }

    /// Apply the teardown policy to every repository this session created.
    /// Always call this after tests; the registry is empty afterwards.
    pub fn tear_down(&mut self) -> Result<TeardownSummary> {
        self.registry.tear_down()
    }

    /// The resolved server environment (discovers it on first use).
    pub fn environment(&mut self) -> Result<TestServerEnvironment> {
        self.locator.environment()
    }

    /// Local directory repositories are created under.
    pub fn local_parent_path(&mut self) -> Result<PathBuf> {
        self.locator.local_parent_path()
    }

    /// Public URL root, with trailing slash; append a repository name to
    /// address it.
    pub fn http_parent_url(&mut self) -> Result<Url> {
        self.locator.http_parent_url()
    }

    /// Number of handles awaiting teardown.
    pub fn registered(&self) -> usize {
        self.registry.len()
    }

    fn create(&mut self, name: &str, policy: NamePolicy) -> Result<RepositoryHandle> {
        let environment = self.locator.environment()?;
        let credentials = self.locator.credentials(&environment.http_parent_url);
        let handle = self
            .provisioner
            .create(&environment, &credentials, name, policy)?;
        self.registry.register(handle.clone());
        Ok(handle)
    }
}
