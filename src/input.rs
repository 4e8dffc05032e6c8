//! Interactive input acquisition.
//!
//! Prompting sits behind the [`Prompter`] trait so the run flow can be
//! driven by canned answers in tests; the production implementation talks
//! to the operator through stdin/stdout. Nothing in the library reads the
//! real stdin except [`StdinPrompter`].

use std::fs;
use std::io;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// Source of operator answers.
pub trait Prompter {
    /// Prints `prompt` on its own line, then reads lines until the first
    /// empty line or end of stream. Returns the lines joined with `\n`,
    /// without a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when reading from the input source fails.
    fn read_multiline(&mut self, prompt: &str) -> io::Result<String>;

    /// Asks a yes/no question (the question text carries its own `(y/n):`
    /// suffix). Affirmative only for a trimmed `y` or `Y`; anything else,
    /// including end of stream, is negative.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when reading from the input source fails.
    fn confirm(&mut self, question: &str) -> io::Result<bool>;
}

/// Production prompter: questions to stdout, answers from stdin.
#[derive(Debug, Default)]
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn read_multiline(&mut self, prompt: &str) -> io::Result<String> {
        println!("{prompt}");
        io::stdout().flush()?;

        let stdin = io::stdin();
        let mut lines = Vec::new();
        for line in stdin.lock().lines() {
            let line = line?;
            if line.is_empty() {
                break;
            }
            lines.push(line);
        }
        Ok(lines.join("\n"))
    }

    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        print!("{question} ");
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(is_affirmative(&answer))
    }
}

/// Yes only for a trimmed `y`, case-insensitive. Everything else is no.
#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

/// Whether `ensure_file` found the file or captured it from the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireStatus {
    Existing,
    Captured,
}

/// Errors from input acquisition.
#[derive(Debug, thiserror::Error)]
pub enum AcquireError {
    #[error("failed to read operator input: {0}")]
    Read(#[from] io::Error),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Makes sure `path` exists: an existing file is used as-is and never
/// modified; a missing one is captured from the prompter and written
/// verbatim, byte for byte as captured (even when empty).
///
/// # Errors
///
/// Returns [`AcquireError::Read`] when prompting fails and
/// [`AcquireError::Write`] when the captured content cannot be written.
pub fn ensure_file(
    path: &Path,
    prompt: &str,
    prompter: &mut dyn Prompter,
) -> Result<AcquireStatus, AcquireError> {
    if path.exists() {
        return Ok(AcquireStatus::Existing);
    }
    let content = prompter.read_multiline(prompt)?;
    fs::write(path, &content).map_err(|source| AcquireError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(AcquireStatus::Captured)
}
