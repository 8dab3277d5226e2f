use thiserror::Error;

/// Top-level error type for the `studycircle-api` crate.
///
/// Covers every failure mode across both API generations: transport,
/// HTTP status failures, application errors embedded in a 200 body, and
/// the persisted credential slot. `studycircle-core` maps these into
/// user-facing store errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The backend rejected the bearer token (HTTP 401) or the login.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Backend ─────────────────────────────────────────────────────
    /// Non-success HTTP status. `message` is the server's error field when
    /// the body carried one.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// `{"error": "..."}` returned with HTTP 200.
    #[error("{message}")]
    Application { message: String },

    /// A response lacked the field an action is documented to return.
    #[error("No {field} ID returned from API")]
    MissingField { field: &'static str },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Local state ─────────────────────────────────────────────────
    /// Reading or writing the persisted credential slot failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl Error {
    /// Returns `true` if the stored credential is no longer accepted and
    /// the user has to log in again.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if this is a transient network error.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error, whether reported via
    /// HTTP 404 or via an application error message.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            Self::Application { message } => message.to_lowercase().contains("not found"),
            _ => false,
        }
    }

    /// The structured error message sent by the backend, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } | Self::Application { message } if !message.is_empty() => {
                Some(message)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_not_found_is_detected_case_insensitively() {
        let err = Error::Application {
            message: "Profile for user u1 Not Found".into(),
        };
        assert!(err.is_not_found());
    }

    #[test]
    fn api_404_is_not_found() {
        let err = Error::Api {
            status: 404,
            message: String::new(),
        };
        assert!(err.is_not_found());
        assert!(err.server_message().is_none());
    }

    #[test]
    fn server_message_prefers_structured_field() {
        let err = Error::Api {
            status: 400,
            message: "Community name already taken".into(),
        };
        assert_eq!(err.server_message(), Some("Community name already taken"));
        assert!(!err.is_auth_expired());
    }
}
