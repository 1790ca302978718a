//! In-memory fake of the Subversion engine
//!
//! Fabricates just enough repository state for lifecycle tests: a
//! plausible on-disk layout (so path assertions hold), per-repository
//! identity, and revision properties recorded from loaded dumps. The dump
//! "parser" here reads only the revision headers and property blocks of
//! the standard dump stream; it is a test double, not a format
//! implementation.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::{Arc, Mutex};

use testbed_svn::{
    Credentials, Error, RepositoryConnection, RepositoryInfo, Result, SvnEngine,
};
use url::Url;

/// Fake [`SvnEngine`] with shared state.
///
/// Clones share state, so keep one clone in the test and hand another to
/// the session under test.
#[derive(Clone, Default)]
pub struct InMemoryEngine {
    state: Arc<Mutex<EngineState>>,
}

#[derive(Default)]
struct EngineState {
    repositories: HashMap<String, RepositoryState>,
    created: u64,
}

struct RepositoryState {
    uuid: String,
    head_revision: u64,
    revision_properties: HashMap<u64, BTreeMap<String, String>>,
}

impl InMemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fabricate a repository out-of-band, bypassing the provisioner, for
    /// adoption tests. Creates the directory and registers engine state.
    pub fn seed_repository(&self, path: &Path) {
        fs::create_dir_all(path).expect("failed to create seeded repository dir");
        write_layout(path);
        let mut state = self.state.lock().expect("engine state poisoned");
        let uuid = next_uuid(&mut state);
        state
            .repositories
            .insert(name_of_path(path), RepositoryState {
                uuid,
                head_revision: 0,
                revision_properties: HashMap::new(),
            });
    }

    /// Names of every repository this engine knows about.
    pub fn repository_names(&self) -> Vec<String> {
        let state = self.state.lock().expect("engine state poisoned");
        let mut names: Vec<String> = state.repositories.keys().cloned().collect();
        names.sort();
        names
    }
}

impl SvnEngine for InMemoryEngine {
    fn create_repository(&self, path: &Path) -> Result<()> {
        let name = name_of_path(path);
        let mut state = self.state.lock().expect("engine state poisoned");
        if state.repositories.contains_key(&name) {
            return Err(Error::RepositoryExists {
                path: path.to_path_buf(),
            });
        }
        write_layout(path);
        let uuid = next_uuid(&mut state);
        state.repositories.insert(name, RepositoryState {
            uuid,
            head_revision: 0,
            revision_properties: HashMap::new(),
        });
        Ok(())
    }

    fn open_connection(
        &self,
        url: &Url,
        _credentials: &Credentials,
    ) -> Result<Box<dyn RepositoryConnection>> {
        let name = name_of_url(url);
        let state = self.state.lock().expect("engine state poisoned");
        if !state.repositories.contains_key(&name) {
            return Err(Error::RepositoryNotFound {
                url: url.to_string(),
            });
        }
        Ok(Box::new(InMemoryConnection {
            state: Arc::clone(&self.state),
            name,
            url: url.clone(),
        }))
    }

    fn load_dump(&self, path: &Path, dump: &mut dyn Read) -> Result<()> {
        let mut text = String::new();
        dump.read_to_string(&mut text).map_err(|e| Error::DumpStream {
            program: "in-memory".into(),
            source: e,
        })?;
        let parsed = parse_dump(&text)?;

        let name = name_of_path(path);
        let mut state = self.state.lock().expect("engine state poisoned");
        let repository =
            state
                .repositories
                .get_mut(&name)
                .ok_or_else(|| Error::RepositoryNotFound {
                    url: path.display().to_string(),
                })?;
        if let Some(uuid) = parsed.uuid {
            repository.uuid = uuid;
        }
        for (revision, properties) in parsed.revisions {
            repository.head_revision = repository.head_revision.max(revision);
            repository.revision_properties.insert(revision, properties);
        }
        Ok(())
    }
}

struct InMemoryConnection {
    state: Arc<Mutex<EngineState>>,
    name: String,
    url: Url,
}

impl RepositoryConnection for InMemoryConnection {
    fn root_url(&self) -> &Url {
        &self.url
    }

    fn info(&self) -> Result<RepositoryInfo> {
        let state = self.state.lock().expect("engine state poisoned");
        let repository =
            state
                .repositories
                .get(&self.name)
                .ok_or_else(|| Error::RepositoryNotFound {
                    url: self.url.to_string(),
                })?;
        Ok(RepositoryInfo {
            root_url: self.url.clone(),
            uuid: repository.uuid.clone(),
            head_revision: repository.head_revision,
        })
    }

    fn revision_property(&self, revision: u64, name: &str) -> Result<Option<String>> {
        let state = self.state.lock().expect("engine state poisoned");
        let repository =
            state
                .repositories
                .get(&self.name)
                .ok_or_else(|| Error::RepositoryNotFound {
                    url: self.url.to_string(),
                })?;
        Ok(repository
            .revision_properties
            .get(&revision)
            .and_then(|properties| properties.get(name))
            .cloned())
    }
}

/// Fabricate the files tests expect a repository root to contain.
fn write_layout(path: &Path) {
    fs::write(path.join("format"), "5\n").expect("failed to write format file");
    fs::create_dir_all(path.join("db")).expect("failed to create db dir");
    fs::write(path.join("db/fs-type"), "fsfs\n").expect("failed to write fs-type");
    fs::create_dir_all(path.join("conf")).expect("failed to create conf dir");
}

fn next_uuid(state: &mut EngineState) -> String {
    state.created += 1;
    format!("00000000-0000-4000-8000-{:012x}", state.created)
}

fn name_of_path(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn name_of_url(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default()
        .to_string()
}

struct ParsedDump {
    uuid: Option<String>,
    revisions: HashMap<u64, BTreeMap<String, String>>,
}

/// Pull revision numbers and their property blocks out of a dump stream.
fn parse_dump(text: &str) -> Result<ParsedDump> {
    if !text.starts_with("SVN-fs-dump-format-version") {
        return Err(Error::MalformedDump {
            message: "missing dump format header".into(),
        });
    }

    let mut parsed = ParsedDump {
        uuid: None,
        revisions: HashMap::new(),
    };
    let mut current_revision: Option<u64> = None;
    let mut lines = text.lines();

    while let Some(line) = lines.next() {
        if let Some(uuid) = line.strip_prefix("UUID: ") {
            parsed.uuid = Some(uuid.trim().to_string());
        } else if let Some(number) = line.strip_prefix("Revision-number: ") {
            let revision = number.trim().parse().map_err(|_| Error::MalformedDump {
                message: format!("bad revision number '{}'", number.trim()),
            })?;
            parsed.revisions.entry(revision).or_default();
            current_revision = Some(revision);
        } else if line.starts_with("K ") {
            let key = lines.next().ok_or_else(|| Error::MalformedDump {
                message: "property key missing after K header".into(),
            })?;
            // skip the "V <len>" header line before the value
            lines.next();
            let value = lines.next().ok_or_else(|| Error::MalformedDump {
                message: format!("property value missing for '{key}'"),
            })?;
            if let Some(revision) = current_revision {
                if let Some(properties) = parsed.revisions.get_mut(&revision) {
                    properties.insert(key.to_string(), value.to_string());
                }
            }
        }
    }
    Ok(parsed)
}
