// ── Per-store loading and error state ──

use tracing::warn;

use crate::error::CoreError;
use crate::model::Session;

/// Loading flag plus the last user-facing error message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStatus {
    loading: bool,
    error: Option<String>,
    login_expired: bool,
}

impl StoreStatus {
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the recorded error is the backend rejecting the session.
    pub fn login_expired(&self) -> bool {
        self.login_expired
    }

    /// Start an operation: set loading, clear the previous error.
    pub fn begin(&mut self) {
        self.loading = true;
        self.clear_error();
    }

    pub fn finish(&mut self) {
        self.loading = false;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_error(&mut self, message: Option<String>) {
        self.error = message;
        self.login_expired = false;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
        self.login_expired = false;
    }

    /// Record `err` as the user-facing error (see [`CoreError::user_message`]).
    pub fn record(&mut self, err: &CoreError, fallback: &str) {
        warn!(error = %err, "{fallback}");
        self.error = Some(err.user_message(fallback));
        self.login_expired = matches!(err, CoreError::AuthenticationFailed { .. });
    }

    /// Flag the recorded error as a rejected session.
    pub(crate) fn mark_login_expired(&mut self) {
        self.login_expired = true;
    }

    /// Record the error of a finished operation, if any, and clear loading.
    pub fn settle<T>(&mut self, result: &Result<T, CoreError>, fallback: &str) {
        if let Err(err) = result {
            self.record(err, fallback);
        }
        self.finish();
    }

    /// Gate an authenticated operation on a live session.
    ///
    /// Missing or expired sessions record [`CoreError::NotLoggedIn`] and
    /// fail before any request is made.
    pub fn require_session<'s>(
        &mut self,
        session: Option<&'s Session>,
    ) -> Result<&'s Session, CoreError> {
        match session {
            Some(s) if !s.is_expired() => Ok(s),
            _ => {
                let err = CoreError::NotLoggedIn;
                self.set_error(Some(err.to_string()));
                Err(err)
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NOT_LOGGED_IN;
    use chrono::{Duration, Utc};

    #[test]
    fn settle_records_and_clears_loading() {
        let mut status = StoreStatus::default();
        status.begin();
        let result: Result<(), CoreError> = Err(CoreError::Rejected {
            message: "nope".into(),
        });
        status.settle(&result, "Failed");
        assert!(!status.is_loading());
        assert_eq!(status.error(), Some("nope"));

        status.begin();
        assert!(status.error().is_none());
    }

    #[test]
    fn expired_session_is_not_logged_in() {
        let mut status = StoreStatus::default();
        let session = Session {
            id: "s1".into(),
            user: "u1".into(),
            expiry: Some(Utc::now() - Duration::minutes(1)),
        };
        assert!(matches!(
            status.require_session(Some(&session)),
            Err(CoreError::NotLoggedIn)
        ));
        assert_eq!(status.error(), Some(NOT_LOGGED_IN));
        assert!(status.require_session(None).is_err());
    }

    #[test]
    fn rejected_session_is_flagged_until_next_operation() {
        let mut status = StoreStatus::default();
        status.record(
            &CoreError::AuthenticationFailed {
                message: "session expired".into(),
            },
            "Failed to fetch",
        );
        assert!(status.login_expired());

        status.begin();
        assert!(!status.login_expired());

        status.record(&CoreError::Rejected { message: "nope".into() }, "Failed");
        assert!(!status.login_expired());
    }
}
