// ── Core error types ──
//
// Pipeline-level errors. Callers of the snapshot assembler never see these
// escape; they decide whether a site or device is skipped or the whole
// cycle ends with an empty snapshot. The `From<omada_api::Error>` impl
// folds transport-layer failures into the variants the pipeline acts on.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Site not found: {name}")]
    SiteNotFound { name: String },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// The `errorCode` from the controller envelope, if any.
        code: Option<i64>,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Authentication problems end the cycle; everything else only skips
    /// the affected site or device.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. })
    }

    /// Worth another attempt: timeouts, refused connections, 429 and 5xx.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::ConnectionFailed { .. } => true,
            Self::Api {
                status: Some(status),
                ..
            } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// A controller-reported string that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed channel descriptor {input:?}: {reason}")]
    ChannelDescriptor { input: String, reason: String },

    #[error("not a coordinate pair {input:?}: {reason}")]
    Coordinates { input: String, reason: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<omada_api::Error> for CoreError {
    fn from(err: omada_api::Error) -> Self {
        if err.is_auth_failure() {
            return CoreError::AuthenticationFailed {
                message: err.to_string(),
            };
        }

        match err {
            // Timeouts arrive as `Error::Timeout` via `Error::from_transport`.
            omada_api::Error::Transport(ref e) => {
                if e.is_connect() || e.is_timeout() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            omada_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            omada_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            omada_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            omada_api::Error::Http { status, url } => CoreError::Api {
                message: format!("HTTP {status} from {url}"),
                code: None,
                status: Some(status),
            },
            omada_api::Error::Api { code, message } => CoreError::Api {
                message,
                code: Some(code),
                status: None,
            },
            omada_api::Error::NoSiteScope => {
                CoreError::Internal("site-scoped request without a site".into())
            }
            omada_api::Error::Deserialization { message, body: _ } => CoreError::Api {
                message: format!("Deserialization error: {message}"),
                code: None,
                status: None,
            },
            // Handled by the is_auth_failure() guard above.
            omada_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            omada_api::Error::NotLoggedIn => CoreError::AuthenticationFailed {
                message: "not logged in".into(),
            },
        }
    }
}
