// ── Enrollment store ──

use tracing::{debug, warn};

use studycircle_api::RpcClient;

use crate::error::CoreError;
use crate::model::{Enrollment, EnrollmentPatch, EntityId, Session};
use crate::store::collection::EntityCollection;
use crate::store::status::StoreStatus;

pub struct EnrollmentStore {
    api: RpcClient,
    enrollments: EntityCollection<Enrollment>,
    pub(crate) status: StoreStatus,
}

impl EnrollmentStore {
    pub fn new(api: RpcClient) -> Self {
        Self {
            api,
            enrollments: EntityCollection::new(),
            status: StoreStatus::default(),
        }
    }

    // ── Views ────────────────────────────────────────────────────────

    pub fn status(&self) -> &StoreStatus {
        &self.status
    }

    pub fn enrollments(&self) -> &EntityCollection<Enrollment> {
        &self.enrollments
    }

    pub fn user_enrollments(&self, user: &EntityId) -> Vec<Enrollment> {
        self.enrollments.filtered(|e| e.owner == *user)
    }

    pub fn visible_enrollments(&self) -> Vec<Enrollment> {
        self.enrollments.filtered(|e| e.visibility)
    }

    pub fn enrollments_by_course(&self, course: &EntityId) -> Vec<Enrollment> {
        self.enrollments.filtered(|e| e.course == *course)
    }

    pub fn enrollments_by_section(&self, section: &EntityId) -> Vec<Enrollment> {
        self.enrollments.filtered(|e| e.section == *section)
    }

    pub fn user_visible_enrollments(&self, user: &EntityId) -> Vec<Enrollment> {
        self.enrollments
            .filtered(|e| e.owner == *user && e.visibility)
    }

    pub fn enrollment_count(&self) -> usize {
        self.enrollments.len()
    }

    pub fn user_enrollment_count(&self, user: &EntityId) -> usize {
        self.enrollments.iter().filter(|e| e.owner == *user).count()
    }

    // ── Mutators ─────────────────────────────────────────────────────

    pub fn set_enrollments(&mut self, enrollments: Vec<Enrollment>) {
        self.enrollments.set_all(enrollments);
    }

    pub fn add_enrollment_local(&mut self, enrollment: Enrollment) {
        self.enrollments.push(enrollment);
    }

    pub fn update_enrollment(&mut self, id: &EntityId, patch: &EnrollmentPatch) {
        self.enrollments.update(id, patch);
    }

    pub fn remove_enrollment_local(&mut self, id: &EntityId) {
        self.enrollments.remove(id);
    }

    pub fn update_enrollment_visibility(&mut self, id: &EntityId, visibility: bool) {
        self.enrollments.update_with(id, |e| e.visibility = visibility);
    }

    pub fn update_enrollment_section_local(&mut self, id: &EntityId, section: &EntityId) {
        self.enrollments.update_with(id, |e| e.section = section.clone());
    }

    pub fn clear_enrollments(&mut self) {
        self.enrollments.clear();
    }

    // ── API operations ───────────────────────────────────────────────

    /// Fetch `owner`'s enrollments and merge them into the cache.
    pub async fn fetch_enrollments_for_owner(&mut self, owner: &EntityId) {
        self.status.begin();
        match self.api.list_enrollments(owner.as_str()).await {
            Ok(records) => {
                debug!(%owner, count = records.len(), "enrollments fetched");
                self.enrollments
                    .merge(records.into_iter().map(Enrollment::from).collect());
            }
            Err(e) => self.status.record(&e.into(), "Failed to fetch enrollments"),
        }
        self.status.finish();
    }

    /// Enroll `owner` in a section.
    ///
    /// The enrollment is recorded from the inputs and the returned id; a
    /// re-added id replaces the earlier record rather than duplicating it.
    pub async fn add_enrollment(
        &mut self,
        session: Option<&Session>,
        owner: &EntityId,
        course: &EntityId,
        section: &EntityId,
        visibility: bool,
    ) -> Result<Enrollment, CoreError> {
        let session = self.status.require_session(session)?;
        self.status.begin();
        let outcome = self
            .api
            .add_enrollment(
                session.id.as_str(),
                owner.as_str(),
                course.as_str(),
                section.as_str(),
                visibility,
            )
            .await;
        let result = match outcome {
            Ok(id) => {
                let enrollment = Enrollment {
                    id: id.into(),
                    owner: owner.clone(),
                    course: course.clone(),
                    section: section.clone(),
                    visibility,
                };
                if self.enrollments.contains(&enrollment.id) {
                    warn!(enrollment = %enrollment.id, "enrollment id already cached, replacing");
                }
                self.enrollments.merge(vec![enrollment.clone()]);
                Ok(enrollment)
            }
            Err(e) => Err(CoreError::from(e)),
        };
        self.status.settle(&result, "Failed to add enrollment");
        result
    }

    /// Move an enrollment to another section of the same course.
    pub async fn update_enrollment_section(
        &mut self,
        session: Option<&Session>,
        enrollment: &EntityId,
        section: &EntityId,
    ) -> Result<(), CoreError> {
        let session = self.status.require_session(session)?;
        self.status.begin();
        let result = self
            .api
            .update_course_section(session.id.as_str(), enrollment.as_str(), section.as_str())
            .await
            .map_err(CoreError::from);
        if result.is_ok() {
            self.update_enrollment_section_local(enrollment, section);
        }
        self.status.settle(&result, "Failed to update enrollment section");
        result
    }

    pub async fn set_enrollment_visibility(
        &mut self,
        session: Option<&Session>,
        enrollment: &EntityId,
        visibility: bool,
    ) -> Result<(), CoreError> {
        let session = self.status.require_session(session)?;
        self.status.begin();
        let result = self
            .api
            .set_enrollment_visibility(session.id.as_str(), enrollment.as_str(), visibility)
            .await
            .map_err(CoreError::from);
        if result.is_ok() {
            self.update_enrollment_visibility(enrollment, visibility);
        }
        self.status.settle(&result, "Failed to update enrollment visibility");
        result
    }

    pub async fn remove_enrollment(
        &mut self,
        session: Option<&Session>,
        enrollment: &EntityId,
    ) -> Result<(), CoreError> {
        let session = self.status.require_session(session)?;
        self.status.begin();
        let result = self
            .api
            .remove_enrollment(session.id.as_str(), enrollment.as_str())
            .await
            .map_err(CoreError::from);
        if result.is_ok() {
            self.remove_enrollment_local(enrollment);
        }
        self.status.settle(&result, "Failed to remove enrollment");
        result
    }

    pub(crate) fn reset(&mut self) {
        self.enrollments.clear();
        self.status.reset();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use studycircle_api::{HttpClient, MemoryStorage, TransportConfig};
    use url::Url;

    fn store() -> EnrollmentStore {
        let http = HttpClient::new(
            Url::parse("http://127.0.0.1:9/api").unwrap(),
            &TransportConfig::default(),
            Arc::new(MemoryStorage::new()),
        )
        .unwrap();
        EnrollmentStore::new(RpcClient::new(http))
    }

    fn enrollment(id: &str, owner: &str, course: &str, section: &str, visible: bool) -> Enrollment {
        Enrollment {
            id: id.into(),
            owner: owner.into(),
            course: course.into(),
            section: section.into(),
            visibility: visible,
        }
    }

    #[test]
    fn views_filter_by_owner_course_and_visibility() {
        let mut store = store();
        store.set_enrollments(vec![
            enrollment("e1", "u1", "c1", "s1", true),
            enrollment("e2", "u1", "c2", "s4", false),
            enrollment("e3", "u2", "c1", "s2", true),
        ]);

        assert_eq!(store.user_enrollment_count(&"u1".into()), 2);
        assert_eq!(store.user_visible_enrollments(&"u1".into()).len(), 1);
        assert_eq!(store.enrollments_by_course(&"c1".into()).len(), 2);
        assert_eq!(store.enrollments_by_section(&"s4".into())[0].id.as_str(), "e2");
        assert_eq!(store.visible_enrollments().len(), 2);
    }

    #[test]
    fn local_section_and_visibility_updates() {
        let mut store = store();
        store.add_enrollment_local(enrollment("e1", "u1", "c1", "s1", true));

        store.update_enrollment_section_local(&"e1".into(), &"s9".into());
        store.update_enrollment_visibility(&"e1".into(), false);

        let e1 = store.enrollments().get(&"e1".into()).unwrap();
        assert_eq!(e1.section.as_str(), "s9");
        assert!(!e1.visibility);
        assert!(store.visible_enrollments().is_empty());
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut store = store();
        store.add_enrollment_local(enrollment("e1", "u1", "c1", "s1", true));
        let before = store.enrollments().version();

        store.update_enrollment_visibility(&"nope".into(), false);
        store.remove_enrollment_local(&"nope".into());

        assert_eq!(store.enrollment_count(), 1);
        assert_eq!(store.enrollments().version(), before);
    }

    #[test]
    fn add_without_session_fails_fast() {
        let mut store = store();
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let err = rt
            .block_on(store.add_enrollment(None, &"u1".into(), &"c1".into(), &"s1".into(), true))
            .unwrap_err();
        assert!(matches!(err, CoreError::NotLoggedIn));
        assert_eq!(store.enrollment_count(), 0);
    }
}
