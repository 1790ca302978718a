//! Engine implementation driving the `svnadmin` and `svn` binaries

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use url::Url;

use crate::engine::{Credentials, RepositoryConnection, RepositoryInfo, SvnEngine};
use crate::{Error, Result};

// svn's "property not found on revision" warning code
const PROPERTY_NOT_FOUND: &str = "W200017";

/// [`SvnEngine`] backed by the Subversion command-line tools.
///
/// `svnadmin` handles local repository administration, `svn` the
/// client-side queries over HTTP.
pub struct CommandEngine {
    svnadmin: PathBuf,
    svn: PathBuf,
}

impl Default for CommandEngine {
    fn default() -> Self {
        Self {
            svnadmin: PathBuf::from("svnadmin"),
            svn: PathBuf::from("svn"),
        }
    }
}

impl CommandEngine {
    /// Use explicit binary locations instead of relying on `PATH`.
    pub fn new(svnadmin: impl Into<PathBuf>, svn: impl Into<PathBuf>) -> Self {
        Self {
            svnadmin: svnadmin.into(),
            svn: svn.into(),
        }
    }
}

impl SvnEngine for CommandEngine {
    fn create_repository(&self, path: &Path) -> Result<()> {
        tracing::debug!(path = %path.display(), "initializing repository");
        let mut cmd = Command::new(&self.svnadmin);
        cmd.arg("create").args(["--fs-type", "fsfs"]).arg(path);
        run_checked(&mut cmd, "svnadmin")?;
        Ok(())
    }

    fn open_connection(
        &self,
        url: &Url,
        credentials: &Credentials,
    ) -> Result<Box<dyn RepositoryConnection>> {
        Ok(Box::new(CommandConnection {
            svn: self.svn.clone(),
            url: url.clone(),
            credentials: credentials.clone(),
        }))
    }

    fn load_dump(&self, path: &Path, dump: &mut dyn Read) -> Result<()> {
        tracing::debug!(path = %path.display(), "loading dump");
        let mut child = Command::new(&self.svnadmin)
            .arg("load")
            .arg("--quiet")
            .arg(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::Spawn {
                program: "svnadmin".into(),
                source: e,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = io::copy(dump, &mut stdin) {
                drop(stdin);
                let _ = child.wait();
                return Err(Error::DumpStream {
                    program: "svnadmin".into(),
                    source: e,
                });
            }
        }

        let output = child.wait_with_output().map_err(|e| Error::Spawn {
            program: "svnadmin".into(),
            source: e,
        })?;
        if !output.status.success() {
            return Err(command_failed("svnadmin", &output));
        }
        Ok(())
    }
}

/// Connection to one repository URL, authenticated with basic credentials.
pub struct CommandConnection {
    svn: PathBuf,
    url: Url,
    credentials: Credentials,
}

impl CommandConnection {
    fn svn_command(&self) -> Command {
        let mut cmd = Command::new(&self.svn);
        cmd.arg("--non-interactive")
            .arg("--no-auth-cache")
            .arg("--username")
            .arg(&self.credentials.username)
            .arg("--password")
            .arg(&self.credentials.password);
        cmd
    }
}

impl RepositoryConnection for CommandConnection {
    fn root_url(&self) -> &Url {
        &self.url
    }

    fn info(&self) -> Result<RepositoryInfo> {
        let mut cmd = self.svn_command();
        cmd.arg("info").arg(self.url.as_str());
        let output = run_checked(&mut cmd, "svn")?;
        parse_info(&String::from_utf8_lossy(&output.stdout))
    }

    fn revision_property(&self, revision: u64, name: &str) -> Result<Option<String>> {
        let mut cmd = self.svn_command();
        cmd.arg("propget")
            .arg("--revprop")
            .arg("-r")
            .arg(revision.to_string())
            .arg(name)
            .arg(self.url.as_str());
        let output = cmd.output().map_err(|e| Error::Spawn {
            program: "svn".into(),
            source: e,
        })?;

        if output.status.success() {
            let value = String::from_utf8_lossy(&output.stdout);
            return Ok(Some(value.trim_end_matches(['\r', '\n']).to_string()));
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.contains(PROPERTY_NOT_FOUND) {
            return Ok(None);
        }
        Err(command_failed("svn", &output))
    }
}

fn run_checked(command: &mut Command, program: &str) -> Result<Output> {
    let output = command.output().map_err(|e| Error::Spawn {
        program: program.into(),
        source: e,
    })?;
    if !output.status.success() {
        return Err(command_failed(program, &output));
    }
    Ok(output)
}

fn command_failed(program: &str, output: &Output) -> Error {
    Error::CommandFailed {
        program: program.into(),
        status: output.status,
        stderr: String::from_utf8_lossy(&output.stderr)
            .trim_end()
            .to_string(),
    }
}

/// Parse `svn info` output, a sequence of `Key: value` lines.
fn parse_info(stdout: &str) -> Result<RepositoryInfo> {
    let mut root = None;
    let mut uuid = None;
    let mut revision = None;

    for line in stdout.lines() {
        if let Some((key, value)) = line.split_once(": ") {
            match key {
                "Repository Root" => root = Some(value.trim().to_string()),
                "Repository UUID" => uuid = Some(value.trim().to_string()),
                "Revision" => revision = value.trim().parse::<u64>().ok(),
                _ => {}
            }
        }
    }

    let root = root.ok_or_else(|| unexpected("missing 'Repository Root'"))?;
    let root_url =
        Url::parse(&root).map_err(|e| unexpected(&format!("bad repository root '{root}': {e}")))?;
    Ok(RepositoryInfo {
        root_url,
        uuid: uuid.ok_or_else(|| unexpected("missing 'Repository UUID'"))?,
        head_revision: revision.ok_or_else(|| unexpected("missing 'Revision'"))?,
    })
}

fn unexpected(message: &str) -> Error {
    Error::UnexpectedOutput {
        program: "svn".into(),
        message: message.to_string(),
    }
}
