// ── Core error types ──
//
// User-facing errors from studycircle-core. Consumers never see raw HTTP
// plumbing; the `From<studycircle_api::Error>` impl folds transport-layer
// failures into domain variants.

use thiserror::Error;

/// Message recorded when an authenticated operation runs without a session.
pub const NOT_LOGGED_IN: &str = "You must be logged in to perform this action";

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session errors ───────────────────────────────────────────────
    #[error("You must be logged in to perform this action")]
    NotLoggedIn,

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Backend request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Entity not found: {entity_type} with id {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("No {field} ID returned from API")]
    MissingResponseField { field: &'static str },

    // ── Operation errors ─────────────────────────────────────────────
    /// The backend answered 200 with `{"error": "..."}`.
    #[error("{message}")]
    Rejected { message: String },

    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Local errors ─────────────────────────────────────────────────
    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The message a store records for this error.
    ///
    /// Prefers the server's structured error text, then this error's own
    /// display, then `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        let message = match self {
            Self::Rejected { message }
            | Self::Api { message, .. }
            | Self::AuthenticationFailed { message } => message.clone(),
            other => other.to_string(),
        };
        if message.trim().is_empty() {
            fallback.to_owned()
        } else {
            message
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Rejected { message } => message.to_ascii_lowercase().contains("not found"),
            _ => false,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<studycircle_api::Error> for CoreError {
    fn from(err: studycircle_api::Error) -> Self {
        use studycircle_api::Error as ApiError;

        match err {
            ApiError::Authentication { message } => CoreError::AuthenticationFailed { message },
            ApiError::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else if e.status().map(|s| s.as_u16()) == Some(404) {
                    CoreError::NotFound {
                        entity_type: "resource".into(),
                        identifier: e.url().map(|u| u.path().to_string()).unwrap_or_default(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            ApiError::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            ApiError::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            ApiError::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            ApiError::Api { status: 404, message } => CoreError::NotFound {
                entity_type: "resource".into(),
                identifier: message,
            },
            ApiError::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            ApiError::Application { message } => CoreError::Rejected { message },
            ApiError::MissingField { field } => CoreError::MissingResponseField { field },
            ApiError::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            ApiError::Storage(message) => CoreError::Storage { message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_error_becomes_rejected_with_server_text() {
        let err = CoreError::from(studycircle_api::Error::Application {
            message: "Community name already taken".into(),
        });
        assert!(matches!(err, CoreError::Rejected { .. }));
        assert_eq!(err.user_message("Failed"), "Community name already taken");
    }

    #[test]
    fn empty_server_text_uses_fallback() {
        let err = CoreError::Api {
            message: String::new(),
            status: Some(500),
        };
        assert_eq!(err.user_message("Failed to fetch communities"), "Failed to fetch communities");
    }

    #[test]
    fn not_logged_in_message() {
        assert_eq!(CoreError::NotLoggedIn.user_message("x"), NOT_LOGGED_IN);
    }

    #[test]
    fn missing_field_keeps_wording() {
        let err = CoreError::from(studycircle_api::Error::MissingField { field: "community" });
        assert_eq!(err.to_string(), "No community ID returned from API");
    }

    #[test]
    fn http_404_is_not_found() {
        let err = CoreError::from(studycircle_api::Error::Api {
            status: 404,
            message: "missing".into(),
        });
        assert!(err.is_not_found());
    }
}
