// RPC API course catalog endpoints
//
// Three levels: terms contain courses, courses contain sections. The
// backend cascades deletes; the catalog store mirrors that locally.

use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::rpc::client::{RpcClient, with_session};
use crate::rpc::models::{CourseFields, CourseRecord, SectionFields, SectionRecord, TermRecord};

const CONCEPT: &str = "CourseCatalog";

impl RpcClient {
    // ── Terms ────────────────────────────────────────────────────────

    /// `POST /CourseCatalog/createTerm`
    pub async fn create_term(&self, session: &str, name: &str) -> Result<String, Error> {
        debug!(name, "creating term");
        self.call_for_id(
            CONCEPT,
            "createTerm",
            "term",
            json!({ "session": session, "name": name }),
        )
        .await
    }

    /// `POST /CourseCatalog/updateTerm`
    pub async fn update_term(&self, session: &str, term: &str, name: &str) -> Result<(), Error> {
        debug!(term, name, "updating term");
        self.call_unit(
            CONCEPT,
            "updateTerm",
            json!({ "session": session, "term": term, "name": name }),
        )
        .await
    }

    /// `POST /CourseCatalog/deleteTerm`
    pub async fn delete_term(&self, session: &str, term: &str) -> Result<(), Error> {
        debug!(term, "deleting term");
        self.call_unit(CONCEPT, "deleteTerm", json!({ "session": session, "term": term }))
            .await
    }

    /// `POST /CourseCatalog/_getAllTerms`
    pub async fn list_terms(&self) -> Result<Vec<TermRecord>, Error> {
        debug!("listing terms");
        self.query_list(CONCEPT, "_getAllTerms", "term", json!({})).await
    }

    // ── Courses ──────────────────────────────────────────────────────

    /// `POST /CourseCatalog/defineCourse`
    pub async fn define_course(
        &self,
        session: &str,
        term: &str,
        fields: &CourseFields,
    ) -> Result<String, Error> {
        debug!(term, course_number = %fields.course_number, "defining course");
        let mut body = with_session(session, serde_json::to_value(fields));
        body["term"] = term.into();
        self.call_for_id(CONCEPT, "defineCourse", "course", body).await
    }

    /// `POST /CourseCatalog/updateCourseDetails`
    pub async fn update_course_details(
        &self,
        session: &str,
        course: &str,
        fields: &CourseFields,
    ) -> Result<(), Error> {
        debug!(course, "updating course details");
        let mut body = with_session(session, serde_json::to_value(fields));
        body["course"] = course.into();
        self.call_unit(CONCEPT, "updateCourseDetails", body).await
    }

    /// `POST /CourseCatalog/removeCourse`
    pub async fn remove_course(&self, session: &str, course: &str) -> Result<(), Error> {
        debug!(course, "removing course");
        self.call_unit(
            CONCEPT,
            "removeCourse",
            json!({ "session": session, "course": course }),
        )
        .await
    }

    /// `POST /CourseCatalog/_getCoursesForTerm`
    pub async fn list_courses(&self, term: &str) -> Result<Vec<CourseRecord>, Error> {
        debug!(term, "listing courses");
        self.query_list(CONCEPT, "_getCoursesForTerm", "course", json!({ "term": term }))
            .await
    }

    // ── Sections ─────────────────────────────────────────────────────

    /// `POST /CourseCatalog/addSection`
    pub async fn add_section(
        &self,
        session: &str,
        course: &str,
        fields: &SectionFields,
    ) -> Result<String, Error> {
        debug!(course, class_type = %fields.class_type, "adding section");
        let mut body = with_session(session, serde_json::to_value(fields));
        body["course"] = course.into();
        self.call_for_id(CONCEPT, "addSection", "section", body).await
    }

    /// `POST /CourseCatalog/editSection`
    pub async fn edit_section(
        &self,
        session: &str,
        section: &str,
        fields: &SectionFields,
    ) -> Result<(), Error> {
        debug!(section, "editing section");
        let mut body = with_session(session, serde_json::to_value(fields));
        body["section"] = section.into();
        self.call_unit(CONCEPT, "editSection", body).await
    }

    /// `POST /CourseCatalog/removeSection`
    pub async fn remove_section(&self, session: &str, section: &str) -> Result<(), Error> {
        debug!(section, "removing section");
        self.call_unit(
            CONCEPT,
            "removeSection",
            json!({ "session": session, "section": section }),
        )
        .await
    }

    /// `POST /CourseCatalog/_getSectionsForCourse`
    pub async fn list_sections(&self, course: &str) -> Result<Vec<SectionRecord>, Error> {
        debug!(course, "listing sections");
        self.query_list(
            CONCEPT,
            "_getSectionsForCourse",
            "section",
            json!({ "course": course }),
        )
        .await
    }
}
