// ── Communities and memberships ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::entity_id::EntityId;
use super::{Entity, patch_field};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Community {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    pub creation_date: Option<DateTime<Utc>>,
    /// Membership ids, denormalized. Empty until memberships are loaded
    /// or someone joins through this client.
    pub memberships: Vec<EntityId>,
}

#[derive(Debug, Clone, Default)]
pub struct CommunityPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub memberships: Option<Vec<EntityId>>,
}

impl Entity for Community {
    type Patch = CommunityPatch;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn apply(&mut self, patch: &CommunityPatch) {
        patch_field(&mut self.name, patch.name.as_ref());
        patch_field(&mut self.description, patch.description.as_ref());
        patch_field(&mut self.memberships, patch.memberships.as_ref());
    }
}

/// Role of a member within one community.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Role {
    Admin,
    #[default]
    Member,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub id: EntityId,
    pub user: EntityId,
    pub community: EntityId,
    pub role: Role,
    pub join_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct MembershipPatch {
    pub role: Option<Role>,
}

impl Entity for Membership {
    type Patch = MembershipPatch;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn apply(&mut self, patch: &MembershipPatch) {
        if let Some(role) = patch.role {
            self.role = role;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn role_round_trips_wire_spelling() {
        assert_eq!(Role::Admin.to_string(), "ADMIN");
        assert_eq!(Role::from_str("member").ok(), Some(Role::Member));
        assert!(Role::from_str("OWNER").is_err());
    }
}
