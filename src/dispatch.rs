//! Download dispatch: destination planning and the concurrent worker pool.
//!
//! Dispatch happens in two phases. Planning walks the link list on the
//! control task: it derives each destination, applies the existence policy,
//! and asks the operator where the policy calls for it, so prompts never
//! come from inside the pool. The run phase then pushes the planned tasks
//! through a semaphore-bounded set of Tokio tasks, each invoking the
//! external tool once, and accounts every task in shared [`BatchStats`].
//!
//! # Concurrency model
//!
//! - Each download runs in its own Tokio task
//! - A semaphore permit is acquired before spawning each task
//! - Permits are released automatically when tasks finish (RAII)
//! - A task failure marks that task failed and nothing else

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tokio::sync::Semaphore;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::ExistencePolicy;
use crate::constants::{FALLBACK_FILENAME, MAX_JOBS};
use crate::cookie::CookieString;
use crate::fetch::{FetchError, Fetcher};
use crate::input::Prompter;
use crate::runlog::RunLog;

/// Minimum worker pool size.
const MIN_JOBS: usize = 1;

/// Errors from dispatcher construction and pool operation.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Pool size outside the supported range.
    #[error("invalid jobs value {value}: must be between {MIN_JOBS} and {MAX_JOBS}")]
    InvalidJobs {
        /// The invalid value that was provided.
        value: usize,
    },

    /// Semaphore was closed unexpectedly.
    #[error("semaphore closed unexpectedly")]
    SemaphoreClosed,
}

/// One URL resolved to a destination in the download directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub url: String,
    pub filename: String,
    pub dest: PathBuf,
}

/// Result of the planning phase: what to fetch and what the policy
/// already settled as skipped.
#[derive(Debug, Default)]
pub struct Plan {
    pub to_download: Vec<Task>,
    pub skipped: Vec<Task>,
}

impl Plan {
    /// Total number of tasks covered by this plan.
    #[must_use]
    pub fn len(&self) -> usize {
        self.to_download.len() + self.skipped.len()
    }

    /// True when the plan covers no tasks at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A failed task and its one-line reason, for the closing summary.
#[derive(Debug, Clone)]
pub struct Failure {
    pub url: String,
    pub reason: String,
}

/// Shared accounting for one batch run.
///
/// Counters are atomic so pool workers update them directly; the progress
/// UI polls the same instance while the pool runs. Every planned task ends
/// up in exactly one of the three counters.
#[derive(Debug, Default)]
pub struct BatchStats {
    downloaded: AtomicUsize,
    skipped: AtomicUsize,
    failed: AtomicUsize,
    tool_missing: AtomicBool,
    failures: Mutex<Vec<Failure>>,
}

impl BatchStats {
    /// Creates a stats tracker with zero counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successfully downloaded tasks.
    #[must_use]
    pub fn downloaded(&self) -> usize {
        self.downloaded.load(Ordering::SeqCst)
    }

    /// Number of tasks settled as skipped by the existence policy.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped.load(Ordering::SeqCst)
    }

    /// Number of failed tasks.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    /// Tasks accounted for so far.
    #[must_use]
    pub fn total(&self) -> usize {
        self.downloaded() + self.skipped() + self.failed()
    }

    /// True when any invocation failed because the tool is not installed.
    #[must_use]
    pub fn tool_missing(&self) -> bool {
        self.tool_missing.load(Ordering::SeqCst)
    }

    /// Failed tasks with their reasons, in completion order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned, which requires a panic in
    /// another accessor while holding it.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn failures(&self) -> Vec<Failure> {
        self.failures
            .lock()
            .expect("failures mutex poisoned")
            .clone()
    }

    fn increment_downloaded(&self) {
        self.downloaded.fetch_add(1, Ordering::SeqCst);
    }

    fn increment_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::SeqCst);
    }

    fn record_failure(&self, url: &str, reason: String, missing_tool: bool) {
        self.failed.fetch_add(1, Ordering::SeqCst);
        if missing_tool {
            self.tool_missing.store(true, Ordering::SeqCst);
        }
        if let Ok(mut failures) = self.failures.lock() {
            failures.push(Failure {
                url: url.to_string(),
                reason,
            });
        }
    }
}

/// Derives the destination filename for a URL: its final path segment,
/// query and fragment excluded. An empty or unusable segment falls back
/// to a fixed name, as does a URL that does not parse at all.
#[must_use]
pub fn derive_filename(url: &str) -> String {
    let segment = Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|mut segments| segments.next_back().map(ToString::to_string))
        })
        .unwrap_or_default();

    let cleaned = sanitize_filename(&segment);
    if cleaned.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        cleaned
    }
}

/// Keeps the segment as close to the URL's spelling as a filename allows:
/// path separators and control characters become `_`, and the dot names
/// that would escape the download directory are rejected.
fn sanitize_filename(segment: &str) -> String {
    let cleaned: String = segment
        .chars()
        .map(|ch| match ch {
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if cleaned == "." || cleaned == ".." {
        String::new()
    } else {
        cleaned
    }
}

/// Walks the link list once, deriving destinations and applying the
/// existence policy. Policy prompts run here, sequentially, before any
/// worker starts.
///
/// # Errors
///
/// Returns an I/O error when a policy prompt cannot be read.
pub fn plan_tasks(
    links: &[String],
    dl_path: &Path,
    policy: ExistencePolicy,
    prompter: &mut dyn Prompter,
) -> io::Result<Plan> {
    let mut plan = Plan::default();
    for url in links {
        let filename = derive_filename(url);
        let dest = dl_path.join(&filename);
        let task = Task {
            url: url.clone(),
            filename,
            dest,
        };

        let download = match policy {
            ExistencePolicy::Force => true,
            ExistencePolicy::Skip => !task.dest.exists(),
            ExistencePolicy::ForceAsk => {
                if task.dest.exists() {
                    prompter.confirm(&format!(
                        "{} already exists. Download it again? (y/n):",
                        task.filename
                    ))?
                } else {
                    true
                }
            }
        };

        if download {
            plan.to_download.push(task);
        } else {
            debug!(dest = %task.dest.display(), "existence policy settled task as skipped");
            plan.skipped.push(task);
        }
    }
    Ok(plan)
}

/// Semaphore-bounded worker pool over the external download tool.
#[derive(Debug)]
pub struct Dispatcher {
    semaphore: Arc<Semaphore>,
    jobs: usize,
    fetcher: Fetcher,
}

impl Dispatcher {
    /// Creates a dispatcher with the given pool size.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidJobs`] if the value is outside the
    /// supported range.
    pub fn new(jobs: usize, fetcher: Fetcher) -> Result<Self, DispatchError> {
        if !(MIN_JOBS..=MAX_JOBS).contains(&jobs) {
            return Err(DispatchError::InvalidJobs { value: jobs });
        }
        debug!(jobs, tool = %fetcher.program_name(), "creating dispatcher");
        Ok(Self {
            semaphore: Arc::new(Semaphore::new(jobs)),
            jobs,
            fetcher,
        })
    }

    /// Returns the configured pool size.
    #[must_use]
    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Runs a plan to completion: records the plan-time skips, pushes
    /// every download task through the pool, and waits for the pool to
    /// drain. All accounting lands in `stats`, which the caller keeps a
    /// handle on (the progress UI polls it while this runs).
    ///
    /// Individual download failures do not error this method; they are
    /// counted and logged. The invariant on return is
    /// `stats.total() == plan.len()`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::SemaphoreClosed`] if the semaphore is
    /// closed, which does not happen in normal operation.
    pub async fn run(
        &self,
        plan: Plan,
        cookie: &CookieString,
        log: &Arc<RunLog>,
        stats: &Arc<BatchStats>,
    ) -> Result<(), DispatchError> {
        for task in &plan.skipped {
            log.info(&format!("skipped (already exists): {}", task.dest.display()));
            stats.increment_skipped();
        }

        info!(
            to_download = plan.to_download.len(),
            skipped = plan.skipped.len(),
            "starting download pool"
        );

        let mut handles = Vec::new();
        for task in plan.to_download {
            // Acquire semaphore permit (blocks while at the pool limit)
            let permit = self
                .semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|_| DispatchError::SemaphoreClosed)?;

            let fetcher = self.fetcher.clone();
            let cookie = cookie.clone();
            let log = Arc::clone(log);
            let stats = Arc::clone(stats);

            handles.push(tokio::spawn(async move {
                // Permit is dropped when this block exits (RAII)
                let _permit = permit;

                debug!(
                    command = %fetcher.redacted_command_line(&task.dest, &task.url),
                    "invoking download tool"
                );
                log.info(&format!(
                    "download start: {} -> {}",
                    task.url,
                    task.dest.display()
                ));

                match fetcher.fetch(&task.url, &cookie, &task.dest).await {
                    Ok(()) => {
                        info!(url = %task.url, dest = %task.dest.display(), "download completed");
                        log.info(&format!(
                            "download ok: {} -> {}",
                            task.url,
                            task.dest.display()
                        ));
                        stats.increment_downloaded();
                    }
                    Err(error) => {
                        warn!(url = %task.url, error = %error, "download failed");
                        log.error(&format!("download failed: {}: {error}", task.url));
                        let missing = matches!(error, FetchError::ToolMissing { .. });
                        stats.record_failure(&task.url, error.to_string(), missing);
                    }
                }
            }));
        }

        debug!(task_count = handles.len(), "waiting for pool to drain");
        for handle in handles {
            // Task panics are logged but do not fail the batch
            if let Err(error) = handle.await {
                warn!(error = %error, "download task panicked");
            }
        }

        info!(
            downloaded = stats.downloaded(),
            skipped = stats.skipped(),
            failed = stats.failed(),
            "download pool drained"
        );
        Ok(())
    }
}
