// ── Study group store (REST generation) ──
//
// Older backend surface with numeric ids. Join and leave refetch the group
// list so member counts come from the server.

use tracing::{debug, warn};

use studycircle_api::RestClient;
use studycircle_api::rest::models::{NewStudyGroup, NewStudySession};

use crate::error::CoreError;
use crate::model::{StudyGroup, StudySession};
use crate::store::status::StoreStatus;

/// Prefer the REST body's `message` field, then a fixed fallback.
fn rest_message(err: &studycircle_api::Error, fallback: &str) -> String {
    err.server_message().unwrap_or(fallback).to_owned()
}

pub struct StudyGroupStore {
    api: RestClient,
    groups: Vec<StudyGroup>,
    sessions: Vec<StudySession>,
    pub(crate) status: StoreStatus,
}

impl StudyGroupStore {
    pub fn new(api: RestClient) -> Self {
        Self {
            api,
            groups: Vec::new(),
            sessions: Vec::new(),
            status: StoreStatus::default(),
        }
    }

    // ── Views ────────────────────────────────────────────────────────

    pub fn status(&self) -> &StoreStatus {
        &self.status
    }

    pub fn groups(&self) -> &[StudyGroup] {
        &self.groups
    }

    pub fn sessions(&self) -> &[StudySession] {
        &self.sessions
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn has_error(&self) -> bool {
        self.status.error().is_some()
    }

    // ── API operations ───────────────────────────────────────────────

    pub async fn fetch_study_groups(&mut self) {
        self.status.begin();
        match self.api.list_study_groups().await {
            Ok(groups) => {
                debug!(count = groups.len(), "study groups fetched");
                self.groups = groups.into_iter().map(StudyGroup::from).collect();
            }
            Err(e) => self.fail(&e, "Failed to fetch study groups"),
        }
        self.status.finish();
    }

    /// Create a group and append the server's copy.
    pub async fn create_study_group(
        &mut self,
        name: &str,
        description: &str,
        subject: &str,
    ) -> Result<StudyGroup, CoreError> {
        self.status.begin();
        let request = NewStudyGroup {
            name: name.to_owned(),
            description: description.to_owned(),
            subject: subject.to_owned(),
        };
        let result = match self.api.create_study_group(&request).await {
            Ok(group) => {
                let group = StudyGroup::from(group);
                self.groups.push(group.clone());
                Ok(group)
            }
            Err(e) => {
                self.fail(&e, "Failed to create study group");
                Err(CoreError::from(e))
            }
        };
        self.status.finish();
        result
    }

    pub async fn join_study_group(&mut self, group_id: i64) -> Result<(), CoreError> {
        match self.api.join_study_group(group_id).await {
            Ok(()) => {
                self.fetch_study_groups().await;
                Ok(())
            }
            Err(e) => {
                self.fail(&e, "Failed to join study group");
                Err(e.into())
            }
        }
    }

    pub async fn leave_study_group(&mut self, group_id: i64) -> Result<(), CoreError> {
        match self.api.leave_study_group(group_id).await {
            Ok(()) => {
                self.fetch_study_groups().await;
                Ok(())
            }
            Err(e) => {
                self.fail(&e, "Failed to leave study group");
                Err(e.into())
            }
        }
    }

    /// Fetch sessions, optionally for one group only.
    pub async fn fetch_study_sessions(&mut self, group_id: Option<i64>) {
        self.status.begin();
        match self.api.list_study_sessions(group_id).await {
            Ok(sessions) => {
                debug!(?group_id, count = sessions.len(), "study sessions fetched");
                self.sessions = sessions.into_iter().map(StudySession::from).collect();
            }
            Err(e) => self.fail(&e, "Failed to fetch study sessions"),
        }
        self.status.finish();
    }

    pub async fn create_study_session(
        &mut self,
        session: NewStudySession,
    ) -> Result<StudySession, CoreError> {
        self.status.begin();
        let result = match self.api.create_study_session(&session).await {
            Ok(created) => {
                let created = StudySession::from(created);
                self.sessions.push(created.clone());
                Ok(created)
            }
            Err(e) => {
                self.fail(&e, "Failed to create study session");
                Err(CoreError::from(e))
            }
        };
        self.status.finish();
        result
    }

    fn fail(&mut self, err: &studycircle_api::Error, fallback: &str) {
        warn!(error = %err, "{fallback}");
        self.status.set_error(Some(rest_message(err, fallback)));
        if err.is_auth_expired() {
            self.status.mark_login_expired();
        }
    }

    pub(crate) fn reset(&mut self) {
        self.groups.clear();
        self.sessions.clear();
        self.status.reset();
    }
}
