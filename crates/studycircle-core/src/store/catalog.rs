// ── Course catalog store ──
//
// Three-level hierarchy. Deletes cascade downward locally the same way
// the backend cascades them: term -> courses -> sections.

use tracing::debug;

use studycircle_api::RpcClient;
use studycircle_api::rpc::models::{CourseFields, SectionFields};

use crate::error::CoreError;
use crate::model::{
    Course, CoursePatch, Entity, EntityId, Section, SectionPatch, Session, Term, TermPatch,
};
use crate::store::collection::EntityCollection;
use crate::store::status::StoreStatus;

/// Descriptive fields of a course.
#[derive(Debug, Clone, Default)]
pub struct CourseDetails {
    pub course_number: String,
    pub course_name: String,
    pub department: String,
}

/// Descriptive fields of a section.
#[derive(Debug, Clone, Default)]
pub struct SectionDetails {
    pub class_type: String,
    pub days: Vec<String>,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub instructor: String,
}

impl From<&CourseDetails> for CourseFields {
    fn from(d: &CourseDetails) -> Self {
        Self {
            course_number: d.course_number.clone(),
            course_name: d.course_name.clone(),
            department: d.department.clone(),
        }
    }
}

impl From<&SectionDetails> for SectionFields {
    fn from(d: &SectionDetails) -> Self {
        Self {
            class_type: d.class_type.clone(),
            days: d.days.clone(),
            start_time: d.start_time.clone(),
            end_time: d.end_time.clone(),
            location: d.location.clone(),
            instructor: d.instructor.clone(),
        }
    }
}

impl From<&CourseDetails> for CoursePatch {
    fn from(d: &CourseDetails) -> Self {
        Self {
            course_number: Some(d.course_number.clone()),
            course_name: Some(d.course_name.clone()),
            department: Some(d.department.clone()),
        }
    }
}

impl From<&SectionDetails> for SectionPatch {
    fn from(d: &SectionDetails) -> Self {
        Self {
            class_type: Some(d.class_type.clone()),
            days: Some(d.days.clone()),
            start_time: Some(d.start_time.clone()),
            end_time: Some(d.end_time.clone()),
            location: Some(d.location.clone()),
            instructor: Some(d.instructor.clone()),
        }
    }
}

pub struct CatalogStore {
    api: RpcClient,
    terms: EntityCollection<Term>,
    courses: EntityCollection<Course>,
    sections: EntityCollection<Section>,
    current_term: Option<Term>,
    current_course: Option<Course>,
    pub(crate) status: StoreStatus,
}

impl CatalogStore {
    pub fn new(api: RpcClient) -> Self {
        Self {
            api,
            terms: EntityCollection::new(),
            courses: EntityCollection::new(),
            sections: EntityCollection::new(),
            current_term: None,
            current_course: None,
            status: StoreStatus::default(),
        }
    }

    // ── Views ────────────────────────────────────────────────────────

    pub fn status(&self) -> &StoreStatus {
        &self.status
    }

    pub fn terms(&self) -> &EntityCollection<Term> {
        &self.terms
    }

    pub fn courses(&self) -> &EntityCollection<Course> {
        &self.courses
    }

    pub fn sections(&self) -> &EntityCollection<Section> {
        &self.sections
    }

    pub fn current_term(&self) -> Option<&Term> {
        self.current_term.as_ref()
    }

    pub fn current_course(&self) -> Option<&Course> {
        self.current_course.as_ref()
    }

    pub fn courses_by_term(&self, term: &EntityId) -> Vec<Course> {
        self.courses.filtered(|c| c.term == *term)
    }

    pub fn sections_by_course(&self, course: &EntityId) -> Vec<Section> {
        self.sections.filtered(|s| s.course == *course)
    }

    pub fn courses_by_department(&self, department: &str) -> Vec<Course> {
        self.courses.filtered(|c| c.department == department)
    }

    pub fn sections_by_instructor(&self, instructor: &str) -> Vec<Section> {
        self.sections.filtered(|s| s.instructor == instructor)
    }

    pub fn sections_by_location(&self, location: &str) -> Vec<Section> {
        self.sections.filtered(|s| s.location == location)
    }

    /// Terms ordered by name.
    pub fn sorted_terms(&self) -> Vec<Term> {
        let mut terms = self.terms.filtered(|_| true);
        terms.sort_by(|a, b| a.name.cmp(&b.name));
        terms
    }

    /// A term's courses ordered by course number.
    pub fn sorted_courses(&self, term: &EntityId) -> Vec<Course> {
        let mut courses = self.courses_by_term(term);
        courses.sort_by(|a, b| a.course_number.cmp(&b.course_number));
        courses
    }

    // ── Mutators ─────────────────────────────────────────────────────

    pub fn set_terms(&mut self, terms: Vec<Term>) {
        self.terms.set_all(terms);
    }

    pub fn set_courses(&mut self, courses: Vec<Course>) {
        self.courses.set_all(courses);
    }

    pub fn set_sections(&mut self, sections: Vec<Section>) {
        self.sections.set_all(sections);
    }

    pub fn add_term(&mut self, term: Term) {
        self.terms.push(term);
    }

    pub fn add_course(&mut self, course: Course) {
        self.courses.push(course);
    }

    pub fn add_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    pub fn update_term(&mut self, id: &EntityId, patch: &TermPatch) {
        self.terms.update(id, patch);
        if let Some(current) = self.current_term.as_mut().filter(|t| t.id == *id) {
            current.apply(patch);
        }
    }

    pub fn update_course(&mut self, id: &EntityId, patch: &CoursePatch) {
        self.courses.update(id, patch);
        if let Some(current) = self.current_course.as_mut().filter(|c| c.id == *id) {
            current.apply(patch);
        }
    }

    pub fn update_section(&mut self, id: &EntityId, patch: &SectionPatch) {
        self.sections.update(id, patch);
    }

    /// Remove a term, its courses, and their sections.
    pub fn remove_term(&mut self, id: &EntityId) {
        self.terms.remove(id);
        let doomed: Vec<EntityId> = self
            .courses
            .iter()
            .filter(|c| c.term == *id)
            .map(|c| c.id.clone())
            .collect();
        for course in &doomed {
            self.remove_course(course);
        }
        if self.current_term.as_ref().is_some_and(|t| t.id == *id) {
            self.current_term = None;
        }
    }

    /// Remove a course and exactly its sections.
    pub fn remove_course(&mut self, id: &EntityId) {
        self.courses.remove(id);
        self.sections.retain(|s| s.course != *id);
        if self.current_course.as_ref().is_some_and(|c| c.id == *id) {
            self.current_course = None;
        }
    }

    pub fn remove_section(&mut self, id: &EntityId) {
        self.sections.remove(id);
    }

    pub fn set_current_term(&mut self, term: Option<Term>) {
        self.current_term = term;
    }

    pub fn set_current_course(&mut self, course: Option<Course>) {
        self.current_course = course;
    }

    // ── Fetch operations ─────────────────────────────────────────────

    pub async fn fetch_terms(&mut self) {
        self.status.begin();
        match self.api.list_terms().await {
            Ok(records) => {
                debug!(count = records.len(), "terms fetched");
                self.set_terms(records.into_iter().map(Term::from).collect());
            }
            Err(e) => self.status.record(&e.into(), "Failed to fetch terms"),
        }
        self.status.finish();
    }

    pub async fn fetch_courses_for_term(&mut self, term: &EntityId) {
        self.status.begin();
        match self.api.list_courses(term.as_str()).await {
            Ok(records) => {
                debug!(%term, count = records.len(), "courses fetched");
                self.courses.merge(records.into_iter().map(Course::from).collect());
            }
            Err(e) => self.status.record(&e.into(), "Failed to fetch courses"),
        }
        self.status.finish();
    }

    pub async fn fetch_sections_for_course(&mut self, course: &EntityId) {
        self.status.begin();
        match self.api.list_sections(course.as_str()).await {
            Ok(records) => {
                debug!(%course, count = records.len(), "sections fetched");
                self.sections.merge(records.into_iter().map(Section::from).collect());
            }
            Err(e) => self.status.record(&e.into(), "Failed to fetch sections"),
        }
        self.status.finish();
    }

    // ── Terms ────────────────────────────────────────────────────────

    pub async fn create_term(&mut self, session: Option<&Session>, name: &str) -> Result<Term, CoreError> {
        let session = self.status.require_session(session)?;
        self.status.begin();
        let outcome = self.api.create_term(session.id.as_str(), name).await;
        let result = match outcome {
            Ok(id) => {
                let term = Term {
                    id: id.into(),
                    name: name.to_owned(),
                };
                self.add_term(term.clone());
                Ok(term)
            }
            Err(e) => Err(CoreError::from(e)),
        };
        self.status.settle(&result, "Failed to create term");
        result
    }

    pub async fn update_term_name(
        &mut self,
        session: Option<&Session>,
        term: &EntityId,
        name: &str,
    ) -> Result<(), CoreError> {
        let session = self.status.require_session(session)?;
        self.status.begin();
        let result = self
            .api
            .update_term(session.id.as_str(), term.as_str(), name)
            .await
            .map_err(CoreError::from);
        if result.is_ok() {
            self.update_term(
                term,
                &TermPatch {
                    name: Some(name.to_owned()),
                },
            );
        }
        self.status.settle(&result, "Failed to update term");
        result
    }

    pub async fn delete_term(&mut self, session: Option<&Session>, term: &EntityId) -> Result<(), CoreError> {
        let session = self.status.require_session(session)?;
        self.status.begin();
        let result = self
            .api
            .delete_term(session.id.as_str(), term.as_str())
            .await
            .map_err(CoreError::from);
        if result.is_ok() {
            self.remove_term(term);
        }
        self.status.settle(&result, "Failed to delete term");
        result
    }

    // ── Courses ──────────────────────────────────────────────────────

    pub async fn create_course(
        &mut self,
        session: Option<&Session>,
        term: &EntityId,
        details: &CourseDetails,
    ) -> Result<Course, CoreError> {
        let session = self.status.require_session(session)?;
        self.status.begin();
        let outcome = self
            .api
            .define_course(session.id.as_str(), term.as_str(), &details.into())
            .await;
        let result = match outcome {
            Ok(id) => {
                let course = Course {
                    id: id.into(),
                    term: term.clone(),
                    course_number: details.course_number.clone(),
                    course_name: details.course_name.clone(),
                    department: details.department.clone(),
                };
                self.add_course(course.clone());
                Ok(course)
            }
            Err(e) => Err(CoreError::from(e)),
        };
        self.status.settle(&result, "Failed to create course");
        result
    }

    pub async fn update_course_details(
        &mut self,
        session: Option<&Session>,
        course: &EntityId,
        details: &CourseDetails,
    ) -> Result<(), CoreError> {
        let session = self.status.require_session(session)?;
        self.status.begin();
        let result = self
            .api
            .update_course_details(session.id.as_str(), course.as_str(), &details.into())
            .await
            .map_err(CoreError::from);
        if result.is_ok() {
            self.update_course(course, &details.into());
        }
        self.status.settle(&result, "Failed to update course");
        result
    }

    pub async fn delete_course(&mut self, session: Option<&Session>, course: &EntityId) -> Result<(), CoreError> {
        let session = self.status.require_session(session)?;
        self.status.begin();
        let result = self
            .api
            .remove_course(session.id.as_str(), course.as_str())
            .await
            .map_err(CoreError::from);
        if result.is_ok() {
            self.remove_course(course);
        }
        self.status.settle(&result, "Failed to delete course");
        result
    }

    // ── Sections ─────────────────────────────────────────────────────

    pub async fn create_section(
        &mut self,
        session: Option<&Session>,
        course: &EntityId,
        details: &SectionDetails,
    ) -> Result<Section, CoreError> {
        let session = self.status.require_session(session)?;
        self.status.begin();
        let outcome = self
            .api
            .add_section(session.id.as_str(), course.as_str(), &details.into())
            .await;
        let result = match outcome {
            Ok(id) => {
                let section = Section {
                    id: id.into(),
                    course: course.clone(),
                    class_type: details.class_type.clone(),
                    days: details.days.clone(),
                    start_time: details.start_time.clone(),
                    end_time: details.end_time.clone(),
                    location: details.location.clone(),
                    instructor: details.instructor.clone(),
                };
                self.add_section(section.clone());
                Ok(section)
            }
            Err(e) => Err(CoreError::from(e)),
        };
        self.status.settle(&result, "Failed to create section");
        result
    }

    pub async fn edit_section(
        &mut self,
        session: Option<&Session>,
        section: &EntityId,
        details: &SectionDetails,
    ) -> Result<(), CoreError> {
        let session = self.status.require_session(session)?;
        self.status.begin();
        let result = self
            .api
            .edit_section(session.id.as_str(), section.as_str(), &details.into())
            .await
            .map_err(CoreError::from);
        if result.is_ok() {
            self.update_section(section, &details.into());
        }
        self.status.settle(&result, "Failed to edit section");
        result
    }

    pub async fn delete_section(&mut self, session: Option<&Session>, section: &EntityId) -> Result<(), CoreError> {
        let session = self.status.require_session(session)?;
        self.status.begin();
        let result = self
            .api
            .remove_section(session.id.as_str(), section.as_str())
            .await
            .map_err(CoreError::from);
        if result.is_ok() {
            self.remove_section(section);
        }
        self.status.settle(&result, "Failed to delete section");
        result
    }

    pub(crate) fn reset(&mut self) {
        self.terms.clear();
        self.courses.clear();
        self.sections.clear();
        self.current_term = None;
        self.current_course = None;
        self.status.reset();
    }
}
