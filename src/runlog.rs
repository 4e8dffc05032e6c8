//! Append-only run log.
//!
//! One file per configured path, opened in append mode and never
//! truncated, so successive runs accumulate history. Every event becomes
//! one timestamped line written with a single write call and flushed
//! immediately; lines from parallel workers cannot interleave mid-line
//! and a crash loses at most the line being written.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::warn;

/// Plain-text level prefix for a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Error,
}

impl LogLevel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared handle to the run log file.
#[derive(Debug)]
pub struct RunLog {
    file: Mutex<File>,
}

impl RunLog {
    /// Opens (or creates) the log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the file cannot be opened;
    /// callers treat that as fatal since a run without its log is blind.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().append(true).create(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends an `INFO` line.
    pub fn info(&self, message: &str) {
        self.append(LogLevel::Info, message);
    }

    /// Appends an `ERROR` line.
    pub fn error(&self, message: &str) {
        self.append(LogLevel::Error, message);
    }

    /// Formats and writes one line, then flushes. Write failures are
    /// reported on stderr and otherwise swallowed: a full disk must not
    /// take the download run down with it.
    fn append(&self, level: LogLevel, message: &str) {
        let line = format!("[{}] {} {}\n", timestamp(), level, message);
        let Ok(mut file) = self.file.lock() else {
            warn!("run log mutex poisoned; dropping line");
            return;
        };
        if let Err(error) = file.write_all(line.as_bytes()).and_then(|()| file.flush()) {
            warn!("failed to append to run log: {error}");
        }
    }
}

/// RFC 3339 UTC timestamp with seconds precision.
fn timestamp() -> String {
    let now = OffsetDateTime::now_utc();
    let now = now.replace_nanosecond(0).unwrap_or(now);
    now.format(&Rfc3339)
        .unwrap_or_else(|_| String::from("unknown-time"))
}
