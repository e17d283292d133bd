use std::time::Duration;

use thiserror::Error;

/// Top-level error type for the `omada-api` crate.
///
/// Covers every failure mode of the controller web API: authentication,
/// transport, the `{errorCode, msg, result}` envelope, and payload decoding.
/// `respondd-core` maps these into pipeline-level errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed (wrong credentials, account locked, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// A request was issued before `login()` produced a session token.
    #[error("Not logged in -- call login() first")]
    NotLoggedIn,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request exceeded the configured transport timeout.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Unexpected HTTP status outside the controller envelope.
    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    // ── Omada API ───────────────────────────────────────────────────
    /// Error from the `{ errorCode, msg }` envelope (`errorCode != 0`).
    #[error("Omada API error {code}: {message}")]
    Api { code: i64, message: String },

    /// A site-scoped endpoint was called on a controller-level client.
    #[error("No site scope -- open a site-scoped client first")]
    NoSiteScope,

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Classify a failed send or body read. Timeouts carry the limit that
    /// was exceeded.
    pub fn from_transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                timeout_secs: timeout.as_secs(),
            }
        } else {
            Self::Transport(err)
        }
    }

    /// Returns `true` if this error means the credentials or the session
    /// were rejected.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            Self::Authentication { .. } | Self::NotLoggedIn => true,
            Self::Api { code, .. } => is_auth_error_code(*code),
            _ => false,
        }
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            Self::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Omada reports login and session failures in the -1200..=-1000 range.
pub(crate) fn is_auth_error_code(code: i64) -> bool {
    (-1200..=-1000).contains(&code)
}
