//! Pre-wired sessions against the fakes

use std::path::Path;

use tempfile::TempDir;
use testbed_core::{EnvironmentConfig, TestbedSession};

use crate::engine::InMemoryEngine;
use crate::probe::{ScriptedOutcome, ScriptedProbe};

/// Parent URL every fixture session resolves to.
pub const PARENT_URL: &str = "http://svn-testbed.invalid/svn/";

/// A temporary repository parent directory.
///
/// Deleted (with everything tests left in it) when dropped.
pub struct TestParent {
    dir: TempDir,
}

impl Default for TestParent {
    fn default() -> Self {
        Self::new()
    }
}

impl TestParent {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp parent dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// A session wired to the fakes, plus handles on the fakes themselves.
pub struct Fixture {
    pub parent: TestParent,
    pub engine: InMemoryEngine,
    pub probe: ScriptedProbe,
    pub session: TestbedSession,
}

/// Build a hermetic session: temp parent directory, scripted probe
/// accepting [`PARENT_URL`], in-memory engine.
pub fn session(label: &str) -> Fixture {
    let parent = TestParent::new();
    let engine = InMemoryEngine::new();
    let probe = ScriptedProbe::new().on(PARENT_URL, ScriptedOutcome::Status(200));
    let config = EnvironmentConfig {
        parent_paths: vec![parent.path().to_path_buf()],
        parent_urls: vec![PARENT_URL.to_string()],
    };
    let session = TestbedSession::with_collaborators(
        label,
        config,
        Box::new(probe.clone()),
        Box::new(engine.clone()),
    );
    Fixture {
        parent,
        engine,
        probe,
        session,
    }
}

/// The dump used by round-trip tests: revision 0 carries the unversioned
/// property `test=yes`.
pub fn revprop_dump() -> &'static str {
    "SVN-fs-dump-format-version: 2\n\
\n\
UUID: 9ff1b372-1b0e-41ec-946b-24d40082c707\n\
\n\
Revision-number: 0\n\
Prop-content-length: 73\n\
Content-length: 73\n\
\n\
K 8\n\
svn:date\n\
V 27\n\
2012-09-25T19:07:32.517877Z\n\
K 4\n\
test\n\
V 3\n\
yes\n\
PROPS-END\n"
}
