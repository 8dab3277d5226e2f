// ── Auth store ──
//
// Current user and session, mirrored into persisted storage so a later
// process can pick the login back up. The session id is the bearer token.

use std::sync::Arc;

use chrono::Utc;
use secrecy::SecretString;
use tracing::{debug, info, warn};

use studycircle_api::{RpcClient, Storage};

use crate::convert::parse_datetime;
use crate::error::CoreError;
use crate::model::{EntityId, Session, User};
use crate::store::status::StoreStatus;

/// Storage key for the serialized current user.
pub const USER_KEY: &str = "user";
/// Storage key for the serialized current session.
pub const SESSION_KEY: &str = "session";

pub struct AuthStore {
    api: RpcClient,
    user: Option<User>,
    session: Option<Session>,
    authenticated: bool,
    pub(crate) status: StoreStatus,
}

impl AuthStore {
    pub fn new(api: RpcClient) -> Self {
        Self {
            api,
            user: None,
            session: None,
            authenticated: false,
            status: StoreStatus::default(),
        }
    }

    // ── Views ────────────────────────────────────────────────────────

    pub fn status(&self) -> &StoreStatus {
        &self.status
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// The current session, unless it has expired or its bearer token is
    /// gone from storage (the backend answered 401).
    pub fn session(&self) -> Option<&Session> {
        self.session
            .as_ref()
            .filter(|s| !s.is_expired() && self.has_token())
    }

    /// Whether the bearer token is still in storage.
    pub fn has_token(&self) -> bool {
        self.api.http().token().is_some()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn is_logged_in(&self) -> bool {
        self.authenticated && self.user.is_some() && self.session().is_some()
    }

    pub fn user_id(&self) -> Option<&EntityId> {
        self.user.as_ref().map(|u| &u.id)
    }

    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.username.as_str())
    }

    // ── Mutators ─────────────────────────────────────────────────────

    pub fn set_user(&mut self, user: User) {
        self.user = Some(user);
        self.authenticated = true;
    }

    pub fn set_session(&mut self, session: Session) {
        self.session = Some(session);
    }

    pub fn clear_auth(&mut self) {
        self.user = None;
        self.session = None;
        self.authenticated = false;
        self.status.clear_error();
    }

    // ── Persistence ──────────────────────────────────────────────────

    fn storage(&self) -> &Arc<dyn Storage> {
        self.api.http().storage()
    }

    /// Write the current user and session (and the bearer token) to storage.
    ///
    /// Does nothing unless both a user and a session are set.
    pub fn save_to_storage(&self) -> Result<(), CoreError> {
        let (Some(user), Some(session)) = (&self.user, &self.session) else {
            return Ok(());
        };
        let user_json =
            serde_json::to_string(user).map_err(|e| CoreError::Internal(e.to_string()))?;
        let session_json =
            serde_json::to_string(session).map_err(|e| CoreError::Internal(e.to_string()))?;
        let written = self
            .storage()
            .set(USER_KEY, &user_json)
            .and_then(|()| self.storage().set(SESSION_KEY, &session_json))
            .and_then(|()| self.api.http().set_token(session.id.as_str()));
        if let Err(e) = written {
            // A partial write must not restore as a login on the next run.
            self.clear_storage();
            return Err(e.into());
        }
        Ok(())
    }

    /// Restore user and session from storage.
    ///
    /// Returns `true` when a live session was restored. Corrupt entries, an
    /// expired session, or a missing bearer token clear both the in-memory
    /// state and storage.
    pub fn load_from_storage(&mut self) -> bool {
        let (Some(user_json), Some(session_json)) = (
            self.storage().get(USER_KEY),
            self.storage().get(SESSION_KEY),
        ) else {
            return false;
        };
        if !self.has_token() {
            debug!("stored session has no bearer token, discarding");
            self.clear_auth();
            self.clear_storage();
            return false;
        }

        let parsed = serde_json::from_str::<User>(&user_json).and_then(|user| {
            serde_json::from_str::<Session>(&session_json).map(|session| (user, session))
        });
        match parsed {
            Ok((_, session)) if session.is_expired() => {
                debug!("stored session expired, discarding");
                self.clear_auth();
                self.clear_storage();
                false
            }
            Ok((user, session)) => {
                debug!(user = %user.id, "restored session from storage");
                self.set_user(user);
                self.set_session(session);
                true
            }
            Err(e) => {
                warn!(error = %e, "corrupt auth state in storage, clearing");
                self.clear_auth();
                self.clear_storage();
                false
            }
        }
    }

    /// Remove user, session, and bearer token from storage.
    pub fn clear_storage(&self) {
        for key in [USER_KEY, SESSION_KEY] {
            if let Err(e) = self.storage().remove(key) {
                warn!(key, error = %e, "failed to clear storage entry");
            }
        }
        if let Err(e) = self.api.http().clear_token() {
            warn!(error = %e, "failed to clear stored token");
        }
    }

    /// Drop the login after the backend rejected the bearer token.
    ///
    /// Returns `true` when a login was actually cleared.
    pub fn expire_rejected_login(&mut self) -> bool {
        if self.session.is_none() && self.user.is_none() {
            return false;
        }
        warn!(user = ?self.user_id(), "backend rejected the session, logging out locally");
        self.clear_auth();
        self.clear_storage();
        true
    }

    // ── API operations ───────────────────────────────────────────────

    /// Create an account. Does not log in.
    pub async fn register(
        &mut self,
        username: &str,
        password: &SecretString,
    ) -> Result<EntityId, CoreError> {
        self.status.begin();
        let result = self
            .api
            .register(username, password)
            .await
            .map(EntityId::from)
            .map_err(CoreError::from);
        self.status.settle(&result, "Registration failed");
        result
    }

    /// Log in, load the user record, and persist the session.
    pub async fn login(&mut self, username: &str, password: &SecretString) -> Result<(), CoreError> {
        self.status.begin();
        let result = self.login_inner(username, password).await;
        self.status.settle(&result, "Login failed");
        result
    }

    async fn login_inner(&mut self, username: &str, password: &SecretString) -> Result<(), CoreError> {
        let grant = self.api.login(username, password).await?;

        let user = match grant.user {
            Some(record) => User::from(record),
            None => match self.api.get_user_by_id(&grant.user_id).await {
                Ok(Some(record)) => User::from(record),
                Ok(None) => synthesized_user(&grant.user_id, username),
                Err(e) => {
                    warn!(error = %e, "could not fetch user record, using login details");
                    synthesized_user(&grant.user_id, username)
                }
            },
        };
        let session = Session {
            id: grant.session_id.into(),
            user: user.id.clone(),
            expiry: parse_datetime(grant.expiry_time.as_deref()),
        };

        self.set_user(user);
        self.set_session(session);
        self.save_to_storage()?;
        info!(username, "logged in");
        Ok(())
    }

    /// End the session. Local state and storage are cleared even when the
    /// server call fails.
    pub async fn logout(&mut self) {
        if let Some(session) = self.session.take() {
            if let Err(e) = self.api.logout(session.id.as_str()).await {
                warn!(error = %e, "server logout failed, clearing local session anyway");
            }
        }
        self.clear_auth();
        self.clear_storage();
        info!("logged out");
    }

    pub(crate) fn reset(&mut self) {
        self.clear_auth();
        self.status.reset();
    }
}

fn synthesized_user(id: &str, username: &str) -> User {
    User {
        id: id.into(),
        username: username.to_owned(),
        registration_date: Some(Utc::now()),
    }
}
