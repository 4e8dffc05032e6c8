//! Opaque cookie string handling.
//!
//! The cookie is an operator-supplied blob captured from a logged-in browser
//! session. It is stored and transmitted byte-for-byte; this module never
//! splits it into key/value pairs and never validates its syntax. The one
//! exception is header rendering: an HTTP header value cannot contain raw
//! line breaks, so those are normalized at that point and nowhere else.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// An opaque authentication cookie string.
///
/// The value is intentionally redacted in Debug output to prevent
/// accidental logging of credentials.
#[derive(Clone)]
pub struct CookieString {
    raw: String,
}

impl CookieString {
    /// Wraps captured cookie text without altering it.
    #[must_use]
    pub fn new(raw: String) -> Self {
        Self { raw }
    }

    /// Reads the cookie file, preserving its bytes.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the file cannot be read.
    pub fn load(path: &Path) -> Result<Self, io::Error> {
        Ok(Self::new(fs::read_to_string(path)?))
    }

    /// Returns the stored text untouched.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// True when the blob contains nothing but whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.raw.trim().is_empty()
    }

    /// Renders the blob as the value of a `Cookie:` request header.
    ///
    /// Trailing newlines are trimmed and interior line breaks collapse to a
    /// single space, because header values cannot carry them. No other byte
    /// is altered.
    #[must_use]
    pub fn header_value(&self) -> String {
        let trimmed = self.raw.trim_end_matches(['\r', '\n']);
        if !trimmed.contains(['\r', '\n']) {
            return trimmed.to_string();
        }
        trimmed
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// Custom Debug impl that redacts the cookie value.
impl fmt::Debug for CookieString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CookieString")
            .field("raw", &"[REDACTED]")
            .finish()
    }
}
