// ── Course catalog: terms, courses, sections ──

use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;
use super::{Entity, patch_field};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub id: EntityId,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct TermPatch {
    pub name: Option<String>,
}

impl Entity for Term {
    type Patch = TermPatch;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn apply(&mut self, patch: &TermPatch) {
        patch_field(&mut self.name, patch.name.as_ref());
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: EntityId,
    pub term: EntityId,
    pub course_number: String,
    pub course_name: String,
    pub department: String,
}

#[derive(Debug, Clone, Default)]
pub struct CoursePatch {
    pub course_number: Option<String>,
    pub course_name: Option<String>,
    pub department: Option<String>,
}

impl Entity for Course {
    type Patch = CoursePatch;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn apply(&mut self, patch: &CoursePatch) {
        patch_field(&mut self.course_number, patch.course_number.as_ref());
        patch_field(&mut self.course_name, patch.course_name.as_ref());
        patch_field(&mut self.department, patch.department.as_ref());
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: EntityId,
    pub course: EntityId,
    pub class_type: String,
    pub days: Vec<String>,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub instructor: String,
}

#[derive(Debug, Clone, Default)]
pub struct SectionPatch {
    pub class_type: Option<String>,
    pub days: Option<Vec<String>>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub location: Option<String>,
    pub instructor: Option<String>,
}

impl Entity for Section {
    type Patch = SectionPatch;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn apply(&mut self, patch: &SectionPatch) {
        patch_field(&mut self.class_type, patch.class_type.as_ref());
        patch_field(&mut self.days, patch.days.as_ref());
        patch_field(&mut self.start_time, patch.start_time.as_ref());
        patch_field(&mut self.end_time, patch.end_time.as_ref());
        patch_field(&mut self.location, patch.location.as_ref());
        patch_field(&mut self.instructor, patch.instructor.as_ref());
    }
}
