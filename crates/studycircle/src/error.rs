//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use studycircle_config::ConfigError;
use studycircle_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const REJECTED: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to backend at {url}")]
    #[diagnostic(
        code(studycircle::connection_failed),
        help(
            "Check that the backend is running and reachable.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(studycircle::timeout),
        help("Increase the timeout with --timeout or check backend responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────
    #[error("You must be logged in to perform this action")]
    #[diagnostic(code(studycircle::not_logged_in), help("Run: studycircle login"))]
    NotLoggedIn,

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(studycircle::auth_failed),
        help(
            "Your session may have expired. Log in again with: studycircle login\n\
             To update a stored password: studycircle config set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("No {what} configured for profile '{profile}'")]
    #[diagnostic(
        code(studycircle::no_credentials),
        help(
            "Pass it on the command line, run: studycircle config init\n\
             Or set STUDYCIRCLE_USERNAME / STUDYCIRCLE_PASSWORD."
        )
    )]
    NoCredentials { what: String, profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(studycircle::not_found),
        help("Run: studycircle {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Backend ──────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(studycircle::rejected))]
    Rejected { message: String },

    #[error("API error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    #[diagnostic(code(studycircle::api_error))]
    ApiError { message: String, status: Option<u16> },

    #[error("Could not persist login state: {message}")]
    #[diagnostic(
        code(studycircle::storage),
        help("Check permissions on the state file (see state_file in your profile).")
    )]
    Storage { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(studycircle::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(studycircle::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: studycircle config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No backend configured")]
    #[diagnostic(
        code(studycircle::no_config),
        help(
            "Create a profile with: studycircle config init\n\
             Or pass --url. Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(studycircle::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(studycircle::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotLoggedIn | Self::AuthFailed { .. } | Self::NoCredentials { .. } => {
                exit_code::AUTH
            }
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotLoggedIn => CliError::NotLoggedIn,

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::ConnectionFailed { url, reason } => {
                CliError::ConnectionFailed { url, reason }
            }

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                list_command: format!("{entity_type}s list"),
                resource_type: entity_type,
                identifier,
            },

            CoreError::Rejected { message } => CliError::Rejected { message },

            CoreError::Api { message, status } => CliError::ApiError { message, status },

            err @ CoreError::MissingResponseField { .. } => CliError::ApiError {
                message: err.to_string(),
                status: None,
            },

            CoreError::Storage { message } => CliError::Storage { message },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::ApiError {
                message,
                status: None,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: String::new(),
            },
            ConfigError::NoUsername { profile } => CliError::NoCredentials {
                what: "username".into(),
                profile,
            },
            ConfigError::NoPassword { profile } => CliError::NoCredentials {
                what: "password".into(),
                profile,
            },
            other => CliError::Config(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_exit_codes() {
        assert_eq!(CliError::from(CoreError::NotLoggedIn).exit_code(), exit_code::AUTH);
        assert_eq!(
            CliError::from(CoreError::Timeout { timeout_secs: 30 }).exit_code(),
            exit_code::TIMEOUT
        );
        assert_eq!(
            CliError::from(CoreError::Rejected {
                message: "Community name already taken".into()
            })
            .exit_code(),
            exit_code::REJECTED
        );
        assert_eq!(
            CliError::from(CoreError::NotFound {
                entity_type: "community".into(),
                identifier: "c1".into(),
            })
            .exit_code(),
            exit_code::NOT_FOUND
        );
    }

    #[test]
    fn rejected_message_is_shown_verbatim() {
        let err = CliError::from(CoreError::Rejected {
            message: "Only admins can delete a community".into(),
        });
        assert_eq!(err.to_string(), "Only admins can delete a community");
    }

    #[test]
    fn api_error_includes_status_when_known() {
        let err = CliError::ApiError {
            message: "boom".into(),
            status: Some(500),
        };
        assert_eq!(err.to_string(), "API error (500): boom");
    }
}
