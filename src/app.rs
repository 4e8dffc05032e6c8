//! Run orchestration for the cookiedl binary.
//!
//! Wires the library pieces into the interactive flow: resolve the
//! configuration, acquire the input files, probe the cookie, confirm with
//! the operator, dispatch the pool, and summarize.

use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use anyhow::{Context, Result, bail};
use tracing::{debug, info, warn};

use cookiedl_core::constants::DOWNLOAD_TOOL;
use cookiedl_core::{
    AcquireStatus, BatchStats, Config, CookieProbe, CookieString, DirStatus, Dispatcher,
    EnvSnapshot, Fetcher, ProbeOutcome, Prompter, RunLog, StdinPrompter, ensure_file,
    plan_tasks, read_links,
};

use crate::cli::Args;
use crate::progress;

/// Final process status, as documented in `--help`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessExit {
    /// Every link downloaded or skipped.
    Success,
    /// Some links downloaded, at least one failed.
    Partial,
    /// Nothing downloaded and something failed, or a fatal error.
    Failure,
}

impl ProcessExit {
    pub(crate) fn code(self) -> u8 {
        match self {
            ProcessExit::Success => 0,
            ProcessExit::Partial => 1,
            ProcessExit::Failure => 2,
        }
    }
}

impl From<ProcessExit> for ExitCode {
    fn from(exit: ProcessExit) -> Self {
        ExitCode::from(exit.code())
    }
}

/// Determines the process exit outcome from downloaded and failed counts.
pub(crate) fn determine_exit_outcome(downloaded: usize, failed: usize) -> ProcessExit {
    if failed == 0 {
        ProcessExit::Success
    } else if downloaded > 0 {
        ProcessExit::Partial
    } else {
        ProcessExit::Failure
    }
}

/// Runs the whole flow. Fatal problems come back as errors and map to
/// exit code 2 in `main`; everything else derives from the batch counts.
pub(crate) async fn run(args: Args) -> Result<ProcessExit> {
    let program = std::env::args().next().unwrap_or_default();
    let config = Config::resolve(&program, &args.overrides(), &EnvSnapshot::from_process());
    debug!(?config, "configuration resolved");

    let dir_status = config.prepare_download_dir()?;
    let dl_display =
        std::path::absolute(&config.dl_path).unwrap_or_else(|_| config.dl_path.clone());
    match dir_status {
        DirStatus::Created => println!("Created download path: {}", dl_display.display()),
        DirStatus::Existing => println!("Using download path: {}", dl_display.display()),
    }

    let log = Arc::new(RunLog::open(&config.log_file).with_context(|| {
        format!("failed to open log file {}", config.log_file.display())
    })?);
    log.info(&format!(
        "run started: policy={}, jobs={}, dl_path={}",
        config.policy,
        config.jobs,
        dl_display.display()
    ));

    let mut prompter = StdinPrompter;

    match ensure_file(
        &config.cookies_file,
        "Paste your cookies (end with an empty line):",
        &mut prompter,
    )? {
        AcquireStatus::Captured => {
            println!("Cookies saved to {}.", config.cookies_file.display());
            log.info(&format!(
                "cookies file created: {}",
                config.cookies_file.display()
            ));
        }
        AcquireStatus::Existing => {
            println!(
                "Using existing cookies file: {}",
                config.cookies_file.display()
            );
        }
    }

    match ensure_file(
        &config.links_file,
        "\nEnter your download links, one per line (end with an empty line):",
        &mut prompter,
    )? {
        AcquireStatus::Captured => {
            println!("Links saved to {}.", config.links_file.display());
            log.info(&format!(
                "links file created: {}",
                config.links_file.display()
            ));
        }
        AcquireStatus::Existing => {
            println!(
                "Using existing links file: {}",
                config.links_file.display()
            );
        }
    }

    let links = read_links(&config.links_file).with_context(|| {
        format!("failed to read links file {}", config.links_file.display())
    })?;
    if links.is_empty() {
        println!("No links found. Exiting.");
        log.info("no links found; nothing to do");
        return Ok(ProcessExit::Success);
    }
    info!(links = links.len(), "links loaded");

    let cookie = CookieString::load(&config.cookies_file).with_context(|| {
        format!(
            "failed to read cookies file {}",
            config.cookies_file.display()
        )
    })?;
    if cookie.is_blank() {
        warn!("cookie file is empty; requests will carry an empty Cookie header");
    }

    if !probe_cookie(&links[0], &cookie, &log).await {
        if prompter.confirm("The cookie test failed. Do you want to continue anyway? (y/n):")? {
            log.info("operator chose to continue after failed cookie probe");
        } else {
            println!("Exiting.");
            log.info("aborted by operator after failed cookie probe");
            return Ok(ProcessExit::Failure);
        }
    }

    if !prompter.confirm("\nDo you want to download the files now using wget? (y/n):")? {
        println!("Download skipped.");
        log.info("download declined by operator");
        return Ok(ProcessExit::Success);
    }

    let plan = plan_tasks(&links, &config.dl_path, config.policy, &mut prompter)
        .context("failed to apply the existence policy")?;
    let total = plan.len();

    let dispatcher = Dispatcher::new(config.jobs, Fetcher::new())?;
    let stats = Arc::new(BatchStats::new());
    let use_spinner = progress::should_use_spinner(
        std::io::stderr().is_terminal(),
        args.quiet,
        progress::is_dumb_terminal(),
    ) && !plan.to_download.is_empty();
    let (progress_handle, stop) =
        progress::spawn_progress_ui(use_spinner, Arc::clone(&stats), total);

    let run_result = dispatcher.run(plan, &cookie, &log, &stats).await;

    stop.store(true, Ordering::SeqCst);
    if let Some(handle) = progress_handle {
        let _ = handle.await;
    }
    run_result?;

    let downloaded = stats.downloaded();
    let skipped = stats.skipped();
    let failed = stats.failed();
    log.info(&format!(
        "summary: {downloaded} downloaded, {skipped} skipped, {failed} failed (total {total})"
    ));
    println!("\n{downloaded} downloaded, {skipped} skipped, {failed} failed (total {total})");
    for failure in stats.failures() {
        println!("  failed: {} ({})", failure.url, failure.reason);
    }

    if stats.tool_missing() {
        bail!("download tool '{DOWNLOAD_TOOL}' not found on PATH; install it and re-run");
    }

    Ok(determine_exit_outcome(downloaded, failed))
}

/// Probes the first link. Prints and logs the outcome; true means passed.
async fn probe_cookie(first_link: &str, cookie: &CookieString, log: &Arc<RunLog>) -> bool {
    println!("\nTesting cookie validity using the first link...");
    log.info(&format!("cookie probe: {first_link}"));

    match CookieProbe::new().check(first_link, cookie).await {
        Ok(ProbeOutcome::Passed) => {
            println!("Cookie test passed.");
            log.info("cookie probe passed");
            true
        }
        Ok(ProbeOutcome::Rejected(status)) => {
            println!(
                "Warning: The test request using the provided cookies failed (HTTP {status}). \
                 This may indicate that the cookies are invalid or expired."
            );
            log.error(&format!("cookie probe rejected: HTTP {status}"));
            false
        }
        Err(error) => {
            println!(
                "Warning: The test request using the provided cookies failed ({error}). \
                 This may indicate that the cookies are invalid or expired."
            );
            log.error(&format!("cookie probe failed: {error}"));
            false
        }
    }
}
