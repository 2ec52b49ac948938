//! Locating and invoking the external analyzer.
//!
//! The process boundary sits behind the [`Analyzer`] trait so suites can be
//! exercised without the real tool installed.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use regress_error::{HarnessError, Result};
use tracing::debug;

use crate::verdict::AnalysisKind;

/// Program name looked up on `PATH`.
pub const ANALYZER_PROGRAM: &str = "ikos";
/// Installation root checked before `PATH`.
pub const INSTALL_ROOT_ENV: &str = "IKOS_INSTALL";

/// One analyzer call, fully resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub source: PathBuf,
    pub kind: AnalysisKind,
    pub output_db: PathBuf,
    pub options: Vec<String>,
}

impl Invocation {
    /// `program source -a <kind> --output-db <path> options...`
    pub fn argv(&self) -> Vec<OsString> {
        let mut argv = vec![
            self.program.clone().into_os_string(),
            self.source.clone().into_os_string(),
            OsString::from("-a"),
            OsString::from(self.kind.as_str()),
            OsString::from("--output-db"),
            self.output_db.clone().into_os_string(),
        ];
        argv.extend(self.options.iter().map(OsString::from));
        argv
    }
}

/// Every argument quoted, so spaces inside one stay unambiguous.
impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, arg) in self.argv().iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:?}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

pub trait Analyzer {
    /// Executable placed first in every [`Invocation`].
    fn program(&self) -> &Path;

    /// Run to completion. Any non-zero exit is an error.
    fn invoke(&self, invocation: &Invocation) -> Result<()>;
}

/// Runs the real analyzer as a child process.
#[derive(Debug, Clone)]
pub struct ProcessAnalyzer {
    program: PathBuf,
}

impl ProcessAnalyzer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Discover the analyzer from the current process environment.
    pub fn locate() -> Result<Self> {
        let locator = ToolLocator::default();
        let install_root = std::env::var_os(locator.install_env);
        let search_path = std::env::var_os("PATH");
        locator
            .resolve(install_root.as_deref(), search_path.as_deref())
            .map(Self::new)
    }
}

impl Analyzer for ProcessAnalyzer {
    fn program(&self) -> &Path {
        &self.program
    }

    fn invoke(&self, invocation: &Invocation) -> Result<()> {
        let argv = invocation.argv();
        let command = invocation.to_string();
        debug!(command = %command, "invoking analyzer");

        let output = Command::new(&argv[0])
            .args(&argv[1..])
            .output()
            .map_err(|source| HarnessError::Spawn {
                command: command.clone(),
                source,
            })?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        debug!(command = %command, status = %output.status, "analyzer exited non-zero");
        Err(HarnessError::AnalyzerFailed {
            command,
            status: output.status.to_string(),
            stderr,
        })
    }
}

/// Where to look for the analyzer executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolLocator {
    pub program: &'static str,
    pub install_env: &'static str,
}

impl Default for ToolLocator {
    fn default() -> Self {
        Self {
            program: ANALYZER_PROGRAM,
            install_env: INSTALL_ROOT_ENV,
        }
    }
}

impl ToolLocator {
    /// `<install_root>/bin/<program>` if executable, else `<program>` on
    /// `search_path`.
    pub fn resolve(
        &self,
        install_root: Option<&std::ffi::OsStr>,
        search_path: Option<&std::ffi::OsStr>,
    ) -> Result<PathBuf> {
        if let Some(root) = install_root {
            let candidate = Path::new(root).join("bin").join(self.program);
            if is_executable(&candidate) {
                debug!(path = %candidate.display(), "analyzer found under install root");
                return Ok(candidate);
            }
        }

        if let Some(paths) = search_path {
            let cwd = std::env::current_dir()?;
            if let Ok(found) = which::which_in(self.program, Some(paths), cwd) {
                debug!(path = %found.display(), "analyzer found on PATH");
                return Ok(found);
            }
        }

        Err(HarnessError::AnalyzerNotFound {
            program: self.program.to_owned(),
            install_env: self.install_env.to_owned(),
        })
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
