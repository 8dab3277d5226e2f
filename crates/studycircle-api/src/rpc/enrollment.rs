// RPC API user enrollment endpoints

use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::rpc::client::RpcClient;
use crate::rpc::models::EnrollmentRecord;

const CONCEPT: &str = "UserEnrollments";

impl RpcClient {
    /// Enroll `owner` in a course section and return the enrollment id.
    ///
    /// `POST /UserEnrollments/addEnrollment`
    pub async fn add_enrollment(
        &self,
        session: &str,
        owner: &str,
        course: &str,
        section: &str,
        visibility: bool,
    ) -> Result<String, Error> {
        debug!(owner, course, section, "adding enrollment");
        self.call_for_id(
            CONCEPT,
            "addEnrollment",
            "enrollment",
            json!({
                "session": session,
                "owner": owner,
                "course": course,
                "section": section,
                "visibility": visibility,
            }),
        )
        .await
    }

    /// `POST /UserEnrollments/updateCourseSection`
    pub async fn update_course_section(
        &self,
        session: &str,
        enrollment: &str,
        new_section: &str,
    ) -> Result<(), Error> {
        debug!(enrollment, new_section, "moving enrollment to section");
        self.call_unit(
            CONCEPT,
            "updateCourseSection",
            json!({ "session": session, "enrollment": enrollment, "newSection": new_section }),
        )
        .await
    }

    /// `POST /UserEnrollments/setEnrollmentVisibility`
    pub async fn set_enrollment_visibility(
        &self,
        session: &str,
        enrollment: &str,
        visibility: bool,
    ) -> Result<(), Error> {
        debug!(enrollment, visibility, "setting enrollment visibility");
        self.call_unit(
            CONCEPT,
            "setEnrollmentVisibility",
            json!({ "session": session, "enrollment": enrollment, "visibility": visibility }),
        )
        .await
    }

    /// `POST /UserEnrollments/removeEnrollment`
    pub async fn remove_enrollment(&self, session: &str, enrollment: &str) -> Result<(), Error> {
        debug!(enrollment, "removing enrollment");
        self.call_unit(
            CONCEPT,
            "removeEnrollment",
            json!({ "session": session, "enrollment": enrollment }),
        )
        .await
    }

    /// `POST /UserEnrollments/_getEnrollmentsByOwner`
    pub async fn list_enrollments(&self, owner: &str) -> Result<Vec<EnrollmentRecord>, Error> {
        debug!(owner, "listing enrollments");
        self.query_list(
            CONCEPT,
            "_getEnrollmentsByOwner",
            "enrollment",
            json!({ "owner": owner }),
        )
        .await
    }
}
