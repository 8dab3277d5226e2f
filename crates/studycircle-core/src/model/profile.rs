// ── User profile ──

use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;
use super::{Entity, patch_field};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: EntityId,
    /// Owning user; at most one profile per user.
    pub user: EntityId,
    pub display_name: String,
    pub bio: String,
    pub thumbnail_image_url: String,
}

#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub thumbnail_image_url: Option<String>,
}

impl Entity for UserProfile {
    type Patch = ProfilePatch;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn apply(&mut self, patch: &ProfilePatch) {
        patch_field(&mut self.display_name, patch.display_name.as_ref());
        patch_field(&mut self.bio, patch.bio.as_ref());
        patch_field(&mut self.thumbnail_image_url, patch.thumbnail_image_url.as_ref());
    }
}
