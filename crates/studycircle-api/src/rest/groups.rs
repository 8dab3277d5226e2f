// REST API study group and study session endpoints

use reqwest::Method;
use tracing::debug;

use crate::error::Error;
use crate::rest::client::RestClient;
use crate::rest::models::{
    NewStudyGroup, NewStudySession, StudyGroup, StudySession, StudySessionUpdate,
};

impl RestClient {
    // ── Study groups ─────────────────────────────────────────────────

    /// `GET /study-groups`
    pub async fn list_study_groups(&self) -> Result<Vec<StudyGroup>, Error> {
        debug!("listing study groups");
        self.get("study-groups", &[]).await
    }

    /// `POST /study-groups`
    pub async fn create_study_group(&self, group: &NewStudyGroup) -> Result<StudyGroup, Error> {
        debug!(name = %group.name, "creating study group");
        self.send(Method::POST, "study-groups", group).await
    }

    /// `POST /study-groups/{id}/join`
    pub async fn join_study_group(&self, group_id: i64) -> Result<(), Error> {
        debug!(group_id, "joining study group");
        self.send_empty(Method::POST, &format!("study-groups/{group_id}/join"))
            .await
            .map(|_| ())
    }

    /// `POST /study-groups/{id}/leave`
    pub async fn leave_study_group(&self, group_id: i64) -> Result<(), Error> {
        debug!(group_id, "leaving study group");
        self.send_empty(Method::POST, &format!("study-groups/{group_id}/leave"))
            .await
            .map(|_| ())
    }

    // ── Study sessions ───────────────────────────────────────────────

    /// `GET /study-sessions`, optionally filtered with `?group_id=`.
    pub async fn list_study_sessions(&self, group_id: Option<i64>) -> Result<Vec<StudySession>, Error> {
        debug!(?group_id, "listing study sessions");
        let query: Vec<(&str, String)> = group_id
            .map(|id| vec![("group_id", id.to_string())])
            .unwrap_or_default();
        self.get("study-sessions", &query).await
    }

    /// `POST /study-sessions`
    pub async fn create_study_session(&self, session: &NewStudySession) -> Result<StudySession, Error> {
        debug!(group_id = session.group_id, title = %session.title, "creating study session");
        self.send(Method::POST, "study-sessions", session).await
    }

    /// `PUT /study-sessions/{id}`
    pub async fn update_study_session(
        &self,
        session_id: i64,
        update: &StudySessionUpdate,
    ) -> Result<StudySession, Error> {
        debug!(session_id, "updating study session");
        self.send(Method::PUT, &format!("study-sessions/{session_id}"), update)
            .await
    }

    /// `DELETE /study-sessions/{id}`
    pub async fn delete_study_session(&self, session_id: i64) -> Result<(), Error> {
        debug!(session_id, "deleting study session");
        self.send_empty(Method::DELETE, &format!("study-sessions/{session_id}"))
            .await
            .map(|_| ())
    }
}
