//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with help text.

use miette::Diagnostic;
use thiserror::Error;

use rpdac_config::ConfigError;
use rpdac_core::{CoreError, error_chain};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to ReportPortal")]
    #[diagnostic(
        code(rpdac::connection_failed),
        help(
            "Check that the endpoint is reachable.\n\
             Use --insecure (-k) if the instance uses a self-signed certificate."
        )
    )]
    ConnectionFailed {
        #[source]
        source: Box<CoreError>,
    },

    #[error("Request timed out")]
    #[diagnostic(
        code(rpdac::timeout),
        help("Increase the timeout with --timeout or check the instance's responsiveness.")
    )]
    Timeout {
        #[source]
        source: Box<CoreError>,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed")]
    #[diagnostic(
        code(rpdac::auth_failed),
        help(
            "Verify the access token (Profile > API Keys in ReportPortal).\n\
             Run: rpdac config set-token"
        )
    )]
    AuthFailed {
        #[source]
        source: Box<CoreError>,
    },

    #[error("No access token configured for profile '{profile}'")]
    #[diagnostic(
        code(rpdac::no_credentials),
        help(
            "Pass --token, set RPDAC_TOKEN, or store one with: rpdac config set-token"
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(rpdac::not_found),
        help("Object names are case sensitive. Check the project with --project.")
    )]
    NotFound(Box<CoreError>),

    #[error(transparent)]
    #[diagnostic(
        code(rpdac::filter_not_resolved),
        help("Apply the filter definition before the dashboards that use it.")
    )]
    FilterNotResolved(Box<CoreError>),

    #[error("{failed} of {total} files failed to apply")]
    #[diagnostic(
        code(rpdac::batch_failed),
        help("Each failure is listed above. Run with -v for details.")
    )]
    BatchFailed { failed: usize, total: usize },

    #[error(transparent)]
    #[diagnostic(code(rpdac::object))]
    Object(Box<CoreError>),

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error ({code}): {message}")]
    #[diagnostic(
        code(rpdac::api_error),
        help("ReportPortal rejected the request. The error code identifies the reason.")
    )]
    ApiError { code: i64, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(rpdac::validation))]
    Validation { field: String, reason: String },

    #[error("No project selected")]
    #[diagnostic(
        code(rpdac::no_project),
        help("Pass --project (-p), set RPDAC_PROJECT, or set `project` in the profile.")
    )]
    NoProject,

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(rpdac::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: rpdac config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No endpoint configured")]
    #[diagnostic(
        code(rpdac::no_config),
        help(
            "Pass --endpoint (-e), set RPDAC_ENDPOINT, or create a config with: rpdac config init\n\
             Config file: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(rpdac::config))]
    Config(Box<ConfigError>),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(rpdac::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render {format} output: {message}")]
    #[diagnostic(code(rpdac::render))]
    Render {
        format: &'static str,
        message: String,
    },
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound(_) => exit_code::NOT_FOUND,
            Self::Validation { .. }
            | Self::NoProject
            | Self::NoConfig { .. }
            | Self::ProfileNotFound { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        if let CoreError::BatchFailed { failed, total, .. } = err {
            return Self::BatchFailed { failed, total };
        }

        if let Some(api) = err.api_error() {
            if api.is_auth() {
                return Self::AuthFailed {
                    source: Box::new(err),
                };
            }
            if api.is_timeout() {
                return Self::Timeout {
                    source: Box::new(err),
                };
            }
            if api.is_connect() {
                return Self::ConnectionFailed {
                    source: Box::new(err),
                };
            }
        }

        if err.is_not_found() {
            return Self::NotFound(Box::new(err));
        }

        if let Some(code) = err.api_error().and_then(rpdac_core::ApiError::api_error_code) {
            return Self::ApiError {
                code,
                message: error_chain(&err),
            };
        }

        match err {
            CoreError::FilterNotResolved { .. } => Self::FilterNotResolved(Box::new(err)),
            other => Self::Object(Box::new(other)),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(Box::new(other)),
        }
    }
}
