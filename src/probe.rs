//! Cookie validation probe.
//!
//! Before any download starts, the first URL of the batch is probed with an
//! HTTP HEAD request carrying the cookie as a `Cookie:` header. No body is
//! transferred either way. The outcome only informs the operator; the
//! decision to abort or continue is theirs.

use std::time::Duration;

use reqwest::header::{self, HeaderValue};
use reqwest::{Client, StatusCode};

use crate::constants::{CONNECT_TIMEOUT_SECS, PROBE_TIMEOUT_SECS};
use crate::cookie::CookieString;

/// Browser-like User-Agent for the probe. Cookie-gated hosts routinely
/// refuse default library agents before even looking at the cookie.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Result of a completed probe exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Final status after redirects was a success status.
    Passed,
    /// The server answered, but not with success.
    Rejected(StatusCode),
}

/// Errors that prevent the probe from completing an exchange.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// The cookie text cannot be carried in a request header at all.
    #[error("cookie string cannot form a request header: {0}")]
    InvalidHeader(#[from] header::InvalidHeaderValue),

    /// DNS, connect, TLS, timeout, or an unparseable URL.
    #[error("probe request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// HEAD-only client for cookie validation.
#[derive(Debug, Clone)]
pub struct CookieProbe {
    client: Client,
}

impl Default for CookieProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl CookieProbe {
    /// Creates the probe client with the standard timeouts.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// timeout configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(PROBE_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Probes `url` with the cookie attached. Redirects are followed; the
    /// final status decides the outcome.
    ///
    /// # Errors
    ///
    /// [`ProbeError::InvalidHeader`] when the cookie cannot be rendered as
    /// a header value, [`ProbeError::Transport`] when no HTTP exchange
    /// completes. Both are probe failures from the operator's point of
    /// view, not crashes.
    pub async fn check(
        &self,
        url: &str,
        cookie: &CookieString,
    ) -> Result<ProbeOutcome, ProbeError> {
        let header_value = HeaderValue::from_str(&cookie.header_value())?;
        let response = self
            .client
            .head(url)
            .header(header::COOKIE, header_value)
            .send()
            .await
            .map_err(|source| ProbeError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(ProbeOutcome::Passed)
        } else {
            Ok(ProbeOutcome::Rejected(status))
        }
    }
}
