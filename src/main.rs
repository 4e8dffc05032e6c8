//! CLI entry point for cookiedl.

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

mod app;
mod cli;
mod progress;

use cli::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let no_color = progress::no_color_env_requested() || progress::is_dumb_terminal();
    progress::init_tracing(default_level, no_color);

    debug!(?args, "CLI arguments parsed");

    match app::run(args).await {
        Ok(exit) => exit.into(),
        Err(error) => {
            eprintln!("Error: {error:#}");
            app::ProcessExit::Failure.into()
        }
    }
}
