//! Constants shared across the crate (timeouts, defaults, tool name).

/// External download tool invoked for every fetch. Resolved via `PATH`.
pub const DOWNLOAD_TOOL: &str = "wget";

/// Destination name used when a URL has no usable final path segment.
pub const FALLBACK_FILENAME: &str = "downloaded_file";

/// Default worker pool size.
pub const DEFAULT_JOBS: usize = 4;

/// Upper bound for `--jobs`.
pub const MAX_JOBS: usize = 16;

/// Probe connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Probe total request timeout (60 seconds; the probe never transfers a body).
pub const PROBE_TIMEOUT_SECS: u64 = 60;

/// How much trailing stderr of a failed tool invocation is kept for the
/// log and the summary.
pub const STDERR_EXCERPT_MAX: usize = 400;
