//! CLI error types with miette diagnostics.
//!
//! Maps core, flow and config errors into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use hotelier_config::ConfigError;
use hotelier_core::{CoreError, FlowError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const REJECTED: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the booking service at {url}")]
    #[diagnostic(
        code(hotelier::connection_failed),
        help(
            "Check that the backend is running and the API URL is right.\n\
             Reason: {reason}\n\
             Try: hotelier --api-url http://localhost:8000/api rooms list"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(hotelier::timeout),
        help("Increase the timeout with --timeout or check the backend's responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(hotelier::auth_failed),
        help(
            "Verify your email and password.\n\
             Run: hotelier config set-password --profile {profile}"
        )
    )]
    AuthFailed { message: String, profile: String },

    #[error("Please log in to continue")]
    #[diagnostic(
        code(hotelier::login_required),
        help("Your session is missing or has expired.\nRun: hotelier login")
    )]
    LoginRequired,

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(hotelier::no_credentials),
        help(
            "Configure an account with: hotelier config init\n\
             Or set HOTELIER_EMAIL and HOTELIER_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    #[error("Not permitted: {message}")]
    #[diagnostic(code(hotelier::forbidden))]
    Forbidden { message: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(hotelier::not_found),
        help("Run: hotelier {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Server ───────────────────────────────────────────────────────

    /// The server's message, unaltered.
    #[error("{message}")]
    #[diagnostic(code(hotelier::rejected))]
    Rejected { message: String },

    #[error("Unexpected response from the booking service")]
    #[diagnostic(code(hotelier::invalid_response), help("{message}"))]
    InvalidResponse { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(hotelier::validation))]
    Validation { field: String, reason: String },

    #[error("Some booking details need attention")]
    #[diagnostic(
        code(hotelier::form),
        help("{details}\nFix these and run the command again, or drop --no-input to be prompted.")
    )]
    Form { details: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(hotelier::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: hotelier config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(hotelier::config))]
    Config(#[from] ConfigError),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(hotelier::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    #[error("Cancelled")]
    #[diagnostic(code(hotelier::cancelled))]
    Cancelled,

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    #[diagnostic(code(hotelier::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::LoginRequired | Self::NoCredentials { .. } => {
                exit_code::AUTH
            }
            Self::Forbidden { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::Validation { .. }
            | Self::Form { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::ProfileNotFound { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout => Self::Timeout,
            CoreError::AuthenticationFailed { message } => Self::AuthFailed {
                message,
                profile: "default".into(),
            },
            CoreError::LoginRequired => Self::LoginRequired,
            CoreError::Forbidden { message } => Self::Forbidden { message },
            CoreError::NotFound { message } => Self::NotFound {
                resource_type: "resource".into(),
                identifier: message,
                list_command: "rooms list".into(),
            },
            CoreError::Rejected { message, status: _ } => Self::Rejected { message },
            CoreError::InvalidInput { message } => Self::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::InvalidResponse { message } => Self::InvalidResponse { message },
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Internal(message) => Self::Internal(message),
        }
    }
}

impl From<FlowError> for CliError {
    fn from(err: FlowError) -> Self {
        match err {
            FlowError::Validation(errors) => Self::Form {
                details: errors
                    .iter()
                    .map(|(field, msg)| format!("  {field}: {msg}"))
                    .collect::<Vec<_>>()
                    .join("\n"),
            },
            FlowError::Submission { message } => Self::Rejected { message },
            FlowError::LoginRequired => Self::LoginRequired,
            other @ (FlowError::SubmissionRequired | FlowError::WrongStep { .. }) => {
                Self::Internal(other.to_string())
            }
        }
    }
}

/// Map a dialoguer / interactive I/O failure into `CliError`.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// A not-found error naming the resource the user asked for.
pub fn not_found(err: CoreError, resource_type: &str, identifier: &str, list: &str) -> CliError {
    match err {
        CoreError::NotFound { .. } => CliError::NotFound {
            resource_type: resource_type.into(),
            identifier: identifier.into(),
            list_command: list.into(),
        },
        other => other.into(),
    }
}
