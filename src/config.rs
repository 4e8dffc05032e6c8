//! Configuration resolution.
//!
//! Every setting resolves with the same precedence: CLI flag, then
//! environment variable, then a default derived from the program's own base
//! name. Resolution itself is a pure function of (program name, overrides,
//! environment snapshot); the only filesystem work is the explicit
//! download-directory preparation step, which runs before any download.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Environment variable for the download directory.
pub const ENV_DL_PATH: &str = "DL_PATH";
/// Environment variable for the cookies file.
pub const ENV_COOKIES_FILE: &str = "COOKIES_FILE";
/// Environment variable for the links file.
pub const ENV_LINKS_FILE: &str = "LINKS_FILE";
/// Environment variable for the run log file.
pub const ENV_LOG_FILE: &str = "LOG_FILE";

/// Fallback program name when argv[0] is empty or unusable.
const FALLBACK_PROGRAM: &str = "cookiedl";

/// What to do when a destination file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExistencePolicy {
    /// Leave the file alone and record the task as skipped.
    #[default]
    Skip,
    /// Download and overwrite unconditionally.
    Force,
    /// Ask the operator per file.
    ForceAsk,
}

impl ExistencePolicy {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ExistencePolicy::Skip => "skip",
            ExistencePolicy::Force => "force",
            ExistencePolicy::ForceAsk => "force-ask",
        }
    }
}

impl std::fmt::Display for ExistencePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings supplied on the command line. All optional; `None` falls
/// through to the environment and then to the name-derived default.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub dl_path: Option<PathBuf>,
    pub cookies_file: Option<PathBuf>,
    pub links_file: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub policy: ExistencePolicy,
    pub jobs: usize,
}

/// Environment values captured once at startup. Empty values count as
/// unset, so `DL_PATH= cookiedl` behaves like plain `cookiedl`.
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    pub dl_path: Option<OsString>,
    pub cookies_file: Option<OsString>,
    pub links_file: Option<OsString>,
    pub log_file: Option<OsString>,
}

impl EnvSnapshot {
    /// Captures the relevant variables from the process environment.
    #[must_use]
    pub fn from_process() -> Self {
        Self {
            dl_path: env_var_non_empty_os(ENV_DL_PATH),
            cookies_file: env_var_non_empty_os(ENV_COOKIES_FILE),
            links_file: env_var_non_empty_os(ENV_LINKS_FILE),
            log_file: env_var_non_empty_os(ENV_LOG_FILE),
        }
    }
}

/// Returns the value of `name` unless it is unset or empty.
fn env_var_non_empty_os(name: &str) -> Option<OsString> {
    std::env::var_os(name).filter(|value| !value.is_empty())
}

/// Immutable per-run configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub dl_path: PathBuf,
    pub cookies_file: PathBuf,
    pub links_file: PathBuf,
    pub log_file: PathBuf,
    pub policy: ExistencePolicy,
    pub jobs: usize,
}

/// Whether `prepare_download_dir` created the directory or found it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirStatus {
    Created,
    Existing,
}

/// Errors from download-directory preparation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to create download directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("download directory {} is not writable: {source}", path.display())]
    NotWritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Config {
    /// Resolves the configuration. Pure: reads nothing but its arguments.
    ///
    /// `program` is argv[0] as invoked; its file stem seeds the default
    /// file names (`<stem>_cookies.txt`, `<stem>_links.txt`, `<stem>.log`).
    /// The default download directory is the current directory.
    #[must_use]
    pub fn resolve(program: &str, overrides: &Overrides, env: &EnvSnapshot) -> Self {
        let stem = program_stem(program);
        Self {
            dl_path: pick(&overrides.dl_path, &env.dl_path, PathBuf::from(".")),
            cookies_file: pick(
                &overrides.cookies_file,
                &env.cookies_file,
                PathBuf::from(format!("{stem}_cookies.txt")),
            ),
            links_file: pick(
                &overrides.links_file,
                &env.links_file,
                PathBuf::from(format!("{stem}_links.txt")),
            ),
            log_file: pick(
                &overrides.log_file,
                &env.log_file,
                PathBuf::from(format!("{stem}.log")),
            ),
            policy: overrides.policy,
            jobs: overrides.jobs,
        }
    }

    /// Creates the download directory if absent and verifies it is
    /// writable by creating and removing a probe file. Runs before any
    /// download work so permission problems surface immediately.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::CreateDir`] when the directory cannot be
    /// created (including when the path exists but is not a directory),
    /// and [`ConfigError::NotWritable`] when the probe file cannot be
    /// written.
    pub fn prepare_download_dir(&self) -> Result<DirStatus, ConfigError> {
        let status = if self.dl_path.is_dir() {
            DirStatus::Existing
        } else {
            fs::create_dir_all(&self.dl_path).map_err(|source| ConfigError::CreateDir {
                path: self.dl_path.clone(),
                source,
            })?;
            DirStatus::Created
        };
        verify_writable(&self.dl_path).map_err(|source| ConfigError::NotWritable {
            path: self.dl_path.clone(),
            source,
        })?;
        Ok(status)
    }
}

fn pick(flag: &Option<PathBuf>, env: &Option<OsString>, default: PathBuf) -> PathBuf {
    flag.clone()
        .or_else(|| env.clone().map(PathBuf::from))
        .unwrap_or(default)
}

/// File stem of argv[0]: `/usr/local/bin/grab` and `grab.exe` both yield
/// `grab`. Falls back to a fixed name when argv[0] is unusable.
#[must_use]
pub fn program_stem(program: &str) -> String {
    Path::new(program)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| FALLBACK_PROGRAM.to_string())
}

fn verify_writable(dir: &Path) -> io::Result<()> {
    let probe = dir.join(format!(".write-probe-{}", std::process::id()));
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&probe)?;
    file.flush()?;
    drop(file);
    fs::remove_file(&probe)
}
