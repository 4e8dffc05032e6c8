//! External download tool invocation.
//!
//! The tool (wget by default) is treated as an opaque black box: we hand it
//! a URL, a `Cookie:` header, and an output path, and read back nothing but
//! its exit status and captured stderr. stdout/stderr are piped, never
//! inherited, so concurrent invocations cannot scribble over the terminal
//! or starve the operator prompts of stdin.

use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use crate::constants::{DOWNLOAD_TOOL, STDERR_EXCERPT_MAX};
use crate::cookie::CookieString;

/// Errors from one tool invocation.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The tool binary is not on `PATH`. Nothing can download without it.
    #[error("download tool '{tool}' not found on PATH")]
    ToolMissing { tool: String },

    /// The tool could not be started for some other reason.
    #[error("failed to start download tool '{tool}': {source}")]
    Spawn {
        tool: String,
        #[source]
        source: io::Error,
    },

    /// The tool ran and reported failure.
    #[error("download tool failed ({status}): {stderr_excerpt}")]
    ToolFailed {
        status: std::process::ExitStatus,
        stderr_excerpt: String,
    },
}

/// Handle for running the external download tool.
#[derive(Debug, Clone)]
pub struct Fetcher {
    program: OsString,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher {
    /// Fetcher for the standard tool, resolved via `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_program(DOWNLOAD_TOOL)
    }

    /// Fetcher for a specific program path. Used by tests and by installs
    /// where the tool is not on `PATH`.
    #[must_use]
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The program this fetcher runs, for messages.
    #[must_use]
    pub fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    /// Downloads `url` to `dest` with the cookie attached as a header.
    /// Success is exit status 0; anything else is a failure carrying the
    /// status and a stderr excerpt.
    ///
    /// # Errors
    ///
    /// [`FetchError::ToolMissing`] when the program is absent,
    /// [`FetchError::Spawn`] for other spawn failures, and
    /// [`FetchError::ToolFailed`] for a non-zero exit.
    pub async fn fetch(
        &self,
        url: &str,
        cookie: &CookieString,
        dest: &Path,
    ) -> Result<(), FetchError> {
        let output = Command::new(&self.program)
            .args(build_args(&cookie.header_value(), dest, url))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| match source.kind() {
                io::ErrorKind::NotFound => FetchError::ToolMissing {
                    tool: self.program_name(),
                },
                _ => FetchError::Spawn {
                    tool: self.program_name(),
                    source,
                },
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(FetchError::ToolFailed {
                status: output.status,
                stderr_excerpt: stderr_excerpt(&output.stderr),
            })
        }
    }

    /// Command line for diagnostics, with the cookie value redacted.
    #[must_use]
    pub fn redacted_command_line(&self, dest: &Path, url: &str) -> String {
        let args = build_args("[REDACTED]", dest, url);
        let mut line = self.program_name();
        for arg in args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }
}

/// Argument vector for one fetch. `--no-verbose` keeps stderr down to one
/// status line per file plus real errors, which is what the failure
/// excerpt wants.
fn build_args(cookie_header: &str, dest: &Path, url: &str) -> Vec<OsString> {
    vec![
        OsString::from("--no-verbose"),
        OsString::from(format!("--header=Cookie: {cookie_header}")),
        OsString::from("-O"),
        dest.as_os_str().to_os_string(),
        OsString::from(url),
    ]
}

/// Flattens captured stderr into a single line and keeps its tail, where
/// the actual error text ends up.
fn stderr_excerpt(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    let flat = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" | ");
    if flat.is_empty() {
        return String::from("(no stderr output)");
    }
    if flat.len() <= STDERR_EXCERPT_MAX {
        return flat;
    }
    let mut start = flat.len() - STDERR_EXCERPT_MAX;
    while !flat.is_char_boundary(start) {
        start += 1;
    }
    format!("...{}", &flat[start..])
}
