//! Links file parsing: one URL per line.

use std::fs;
use std::io;
use std::path::Path;

/// Parses links text into URLs: one per line, surrounding whitespace
/// trimmed, empty lines ignored. Order is preserved and nothing is
/// validated here; a junk line becomes a task that fails downstream.
#[must_use]
pub fn parse_links(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Reads and parses the links file.
///
/// # Errors
///
/// Returns the underlying I/O error when the file cannot be read.
pub fn read_links(path: &Path) -> io::Result<Vec<String>> {
    Ok(parse_links(&fs::read_to_string(path)?))
}
