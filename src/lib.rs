//! Cookiedl core library
//!
//! Everything testable behind the `cookiedl` binary: batch-downloading a
//! list of cookie-gated links through an external wget-style tool, with an
//! interactive first-run setup and an append-only run log.
//!
//! # Architecture
//!
//! - [`config`] - Flag / environment / name-derived-default resolution
//! - [`input`] - Operator prompting and input-file acquisition
//! - [`links`] - Links file parsing
//! - [`cookie`] - Opaque cookie string handling
//! - [`probe`] - Cookie validation via a no-body HEAD request
//! - [`dispatch`] - Destination planning, existence policy, worker pool
//! - [`fetch`] - External download tool invocation
//! - [`runlog`] - Append-only timestamped run log

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod constants;
pub mod cookie;
pub mod dispatch;
pub mod fetch;
pub mod input;
pub mod links;
pub mod probe;
pub mod runlog;

// Re-export commonly used types
pub use config::{Config, ConfigError, DirStatus, EnvSnapshot, ExistencePolicy, Overrides};
pub use cookie::CookieString;
pub use dispatch::{
    BatchStats, DispatchError, Dispatcher, Failure, Plan, Task, derive_filename, plan_tasks,
};
pub use fetch::{FetchError, Fetcher};
pub use input::{
    AcquireError, AcquireStatus, Prompter, StdinPrompter, ensure_file, is_affirmative,
};
pub use links::{parse_links, read_links};
pub use probe::{CookieProbe, ProbeError, ProbeOutcome};
pub use runlog::{LogLevel, RunLog};
