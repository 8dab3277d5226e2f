// ── User enrollments ──

use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;
use super::{Entity, patch_field};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: EntityId,
    pub owner: EntityId,
    pub course: EntityId,
    pub section: EntityId,
    /// Whether other users may see this enrollment.
    pub visibility: bool,
}

#[derive(Debug, Clone, Default)]
pub struct EnrollmentPatch {
    pub section: Option<EntityId>,
    pub visibility: Option<bool>,
}

impl Entity for Enrollment {
    type Patch = EnrollmentPatch;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn apply(&mut self, patch: &EnrollmentPatch) {
        patch_field(&mut self.section, patch.section.as_ref());
        patch_field(&mut self.visibility, patch.visibility.as_ref());
    }
}
