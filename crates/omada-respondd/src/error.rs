//! CLI error types with miette diagnostics.
//!
//! Only startup can fail: once a cycle runs, failures are logged and the
//! snapshot shrinks instead.

use miette::Diagnostic;
use thiserror::Error;

use respondd_config::ConfigError;
use respondd_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration file not found: {path}")]
    #[diagnostic(
        code(omada_respondd::no_config),
        help("Pass an existing file with --config, or omit it to use {default}")
    )]
    NoConfig { path: String, default: String },

    #[error("Configuration could not be loaded")]
    #[diagnostic(
        code(omada_respondd::config),
        help(
            "Expected a TOML file at {path} or RESPONDD_* environment variables.\n\
             Required keys: controller_url, username."
        )
    )]
    Config {
        path: String,
        #[source]
        source: Box<figment::Error>,
    },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(omada_respondd::validation))]
    Validation { field: String, reason: String },

    #[error("No password configured for '{username}'")]
    #[diagnostic(
        code(omada_respondd::no_credentials),
        help("Set RESPONDD_PASSWORD, name a variable with password_env, or set password.")
    )]
    NoCredentials { username: String },

    // ── Output ───────────────────────────────────────────────────────
    #[error("Could not render output: {message}")]
    #[diagnostic(code(omada_respondd::output))]
    Output { message: String },

    #[error("{0}")]
    #[diagnostic(code(omada_respondd::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoConfig { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            Self::NoCredentials { .. } => exit_code::AUTH,
            Self::Config { .. } | Self::Output { .. } | Self::Internal(_) => exit_code::GENERAL,
        }
    }
}

// ── ConfigError / CoreError → CliError mapping ───────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NotFound { path } => Self::NoConfig {
                path: path.display().to_string(),
                default: respondd_config::config_path().display().to_string(),
            },
            ConfigError::Figment(source) => Self::Config {
                path: respondd_config::config_path().display().to_string(),
                source,
            },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::NoCredentials { username } => Self::NoCredentials { username },
            ConfigError::Serialization(e) => Self::Output {
                message: e.to_string(),
            },
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Output {
            message: err.to_string(),
        }
    }
}
