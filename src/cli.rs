//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use cookiedl_core::constants::{DEFAULT_JOBS, MAX_JOBS};
use cookiedl_core::{ExistencePolicy, Overrides};

const AFTER_HELP: &str = "Environment:
  DL_PATH       Download path used when --dl-path is absent
  COOKIES_FILE  Cookies file used when --cookies is absent
  LINKS_FILE    Links file used when --links is absent
  LOG_FILE      Run log file used when --log is absent

Exit codes:
  0 = all links downloaded or skipped
  1 = partial success (some links failed)
  2 = complete failure or fatal error";

/// Download files concurrently using cookies and links files.
///
/// Reads a links file (one URL per line) and a cookie string captured from
/// a logged-in browser session. Missing input files are captured
/// interactively on first run. The cookie is validated against the first
/// link before wget is handed the batch.
#[derive(Parser, Debug)]
#[command(name = "cookiedl")]
#[command(author, version, about)]
#[command(after_help = AFTER_HELP)]
pub struct Args {
    /// Download path (default: current directory or DL_PATH environment variable)
    #[arg(long, value_name = "PATH")]
    pub dl_path: Option<PathBuf>,

    /// Cookies file (default: <program>_cookies.txt or COOKIES_FILE environment variable)
    #[arg(long, value_name = "FILE")]
    pub cookies: Option<PathBuf>,

    /// Links file (default: <program>_links.txt or LINKS_FILE environment variable)
    #[arg(long, value_name = "FILE")]
    pub links: Option<PathBuf>,

    /// Run log file (default: <program>.log or LOG_FILE environment variable)
    #[arg(long, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Re-download and overwrite files that already exist
    #[arg(long, conflicts_with = "force_download_ask")]
    pub force_download: bool,

    /// Ask per existing file whether to re-download it
    #[arg(long)]
    pub force_download_ask: bool,

    /// Concurrent downloads (1-16)
    #[arg(short = 'j', long, default_value_t = DEFAULT_JOBS as u8, value_parser = clap::value_parser!(u8).range(1..=MAX_JOBS as i64))]
    pub jobs: u8,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Existence policy selected by the force flags.
    pub fn policy(&self) -> ExistencePolicy {
        if self.force_download {
            ExistencePolicy::Force
        } else if self.force_download_ask {
            ExistencePolicy::ForceAsk
        } else {
            ExistencePolicy::Skip
        }
    }

    /// Settings to feed into configuration resolution.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            dl_path: self.dl_path.clone(),
            cookies_file: self.cookies.clone(),
            links_file: self.links.clone(),
            log_file: self.log.clone(),
            policy: self.policy(),
            jobs: usize::from(self.jobs),
        }
    }
}
