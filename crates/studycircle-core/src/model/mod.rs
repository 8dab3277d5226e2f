// ── Domain model ──
//
// Canonical types the stores own. Wire records from `studycircle_api`
// are converted into these in `crate::convert`.

pub mod auth;
pub mod board;
pub mod catalog;
pub mod community;
pub mod enrollment;
pub mod entity_id;
pub mod profile;
pub mod study_group;

pub use auth::{Session, User};
pub use board::{NewPost, Post, PostPatch, Reply, ReplyPatch, dedupe_tags};
pub use catalog::{Course, CoursePatch, Section, SectionPatch, Term, TermPatch};
pub use community::{Community, CommunityPatch, Membership, MembershipPatch, Role};
pub use enrollment::{Enrollment, EnrollmentPatch};
pub use entity_id::EntityId;
pub use profile::{ProfilePatch, UserProfile};
pub use study_group::{StudyGroup, StudyGroupMember, StudySession};

/// A store-owned record with a stable id and a partial-update shape.
pub trait Entity: Clone {
    /// All-optional field set; `None` leaves a field unchanged.
    type Patch;

    fn id(&self) -> &EntityId;

    /// Merge `patch` into `self` in place.
    fn apply(&mut self, patch: &Self::Patch);
}

/// Overwrite `slot` when the patch carries a value.
pub(crate) fn patch_field<T: Clone>(slot: &mut T, value: Option<&T>) {
    if let Some(v) = value {
        slot.clone_from(v);
    }
}
