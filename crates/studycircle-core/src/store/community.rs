// ── Community store ──
//
// Communities and memberships. The community's own `memberships` id list
// is denormalized; this store keeps it in step with the membership
// collection for changes made through this client.

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use studycircle_api::RpcClient;

use crate::error::CoreError;
use crate::model::{
    Community, CommunityPatch, Entity, EntityId, Membership, MembershipPatch, Role, Session,
};
use crate::store::collection::EntityCollection;
use crate::store::status::StoreStatus;

pub struct CommunityStore {
    api: RpcClient,
    communities: EntityCollection<Community>,
    memberships: EntityCollection<Membership>,
    current: Option<Community>,
    pub(crate) status: StoreStatus,
}

impl CommunityStore {
    pub fn new(api: RpcClient) -> Self {
        Self {
            api,
            communities: EntityCollection::new(),
            memberships: EntityCollection::new(),
            current: None,
            status: StoreStatus::default(),
        }
    }

    // ── Views ────────────────────────────────────────────────────────

    pub fn status(&self) -> &StoreStatus {
        &self.status
    }

    pub fn communities(&self) -> &EntityCollection<Community> {
        &self.communities
    }

    pub fn memberships(&self) -> &EntityCollection<Membership> {
        &self.memberships
    }

    pub fn current_community(&self) -> Option<&Community> {
        self.current.as_ref()
    }

    /// Communities `user` belongs to, in collection order.
    pub fn user_communities(&self, user: &EntityId) -> Vec<Community> {
        self.communities_where(|m| m.user == *user)
    }

    /// Communities where `user` holds the admin role.
    pub fn admin_communities(&self, user: &EntityId) -> Vec<Community> {
        self.communities_where(|m| m.user == *user && m.role == Role::Admin)
    }

    pub fn community_members(&self, community: &EntityId) -> Vec<Membership> {
        self.memberships.filtered(|m| m.community == *community)
    }

    pub fn membership_for(&self, community: &EntityId, user: &EntityId) -> Option<&Membership> {
        self.memberships
            .find(|m| m.community == *community && m.user == *user)
    }

    pub fn is_user_admin(&self, community: &EntityId, user: &EntityId) -> bool {
        self.membership_for(community, user)
            .is_some_and(|m| m.role == Role::Admin)
    }

    fn communities_where(&self, mut pred: impl FnMut(&Membership) -> bool) -> Vec<Community> {
        let ids: Vec<&EntityId> = self
            .memberships
            .iter()
            .filter(|m| pred(m))
            .map(|m| &m.community)
            .collect();
        self.communities.filtered(|c| ids.contains(&&c.id))
    }

    // ── Mutators ─────────────────────────────────────────────────────

    pub fn set_communities(&mut self, communities: Vec<Community>) {
        self.communities.set_all(communities);
    }

    pub fn set_memberships(&mut self, memberships: Vec<Membership>) {
        self.memberships.set_all(memberships);
    }

    pub fn add_community(&mut self, community: Community) {
        self.communities.push(community);
    }

    pub fn update_community(&mut self, id: &EntityId, patch: &CommunityPatch) {
        self.communities.update(id, patch);
        if let Some(current) = self.current.as_mut().filter(|c| c.id == *id) {
            current.apply(patch);
        }
    }

    /// Remove a community and exactly its memberships.
    pub fn remove_community(&mut self, id: &EntityId) {
        self.communities.remove(id);
        self.memberships.retain(|m| m.community != *id);
        if self.current.as_ref().is_some_and(|c| c.id == *id) {
            self.current = None;
        }
    }

    pub fn add_membership(&mut self, membership: Membership) {
        self.memberships.push(membership);
    }

    pub fn update_membership(&mut self, id: &EntityId, patch: &MembershipPatch) {
        self.memberships.update(id, patch);
    }

    /// Remove a membership and drop its id from the owning community.
    pub fn remove_membership(&mut self, id: &EntityId) {
        let Some(membership) = self.memberships.remove(id) else {
            return;
        };
        let unlink = |c: &mut Community| c.memberships.retain(|m| m != id);
        self.communities.update_with(&membership.community, unlink);
        if let Some(current) = self
            .current
            .as_mut()
            .filter(|c| c.id == membership.community)
        {
            unlink(current);
        }
    }

    pub fn set_current_community(&mut self, community: Option<Community>) {
        self.current = community;
    }

    // ── API operations ───────────────────────────────────────────────

    pub async fn fetch_communities(&mut self) {
        self.status.begin();
        match self.api.list_communities().await {
            Ok(records) => {
                debug!(count = records.len(), "communities fetched");
                self.set_communities(records.into_iter().map(Community::from).collect());
            }
            Err(e) => self.status.record(&e.into(), "Failed to fetch communities"),
        }
        self.status.finish();
    }

    /// Refresh memberships. Leaves the loading flag alone.
    pub async fn fetch_memberships(&mut self) {
        self.status.clear_error();
        match self.api.list_memberships().await {
            Ok(records) => {
                debug!(count = records.len(), "memberships fetched");
                self.set_memberships(records.into_iter().map(Membership::from).collect());
            }
            Err(e) => self.status.record(&e.into(), "Failed to fetch memberships"),
        }
    }

    /// Fetch one community, merge it, and make it current.
    pub async fn fetch_community(&mut self, id: &EntityId) -> Option<Community> {
        self.status.begin();
        let found = match self.api.get_community(id.as_str()).await {
            Ok(Some(record)) => Some(Community::from(record)),
            Ok(None) => {
                self.status.record(
                    &CoreError::NotFound {
                        entity_type: "community".into(),
                        identifier: id.to_string(),
                    },
                    "Failed to fetch community",
                );
                None
            }
            Err(e) => {
                self.status.record(&e.into(), "Failed to fetch community");
                None
            }
        };
        if let Some(community) = &found {
            self.communities.merge(vec![community.clone()]);
            self.current = Some(community.clone());
        }
        self.status.finish();
        found
    }

    /// Create a community owned by `creator`.
    ///
    /// When the follow-up detail fetch fails or comes back in an unexpected
    /// shape, the community is built from the inputs instead.
    pub async fn create_community(
        &mut self,
        session: Option<&Session>,
        name: &str,
        description: &str,
        creator: &EntityId,
    ) -> Result<Community, CoreError> {
        let session = self.status.require_session(session)?;
        self.status.begin();
        let result = self
            .create_community_inner(session, name, description, creator)
            .await;
        self.status.settle(&result, "Failed to create community");
        result
    }

    async fn create_community_inner(
        &mut self,
        session: &Session,
        name: &str,
        description: &str,
        creator: &EntityId,
    ) -> Result<Community, CoreError> {
        let id = self
            .api
            .create_community(session.id.as_str(), name, description, creator.as_str())
            .await?;

        let community = match self.api.get_community(&id).await {
            Ok(Some(record)) if record.id == id => Community::from(record),
            Ok(_) => {
                debug!(community = %id, "unexpected community detail shape, using inputs");
                synthesized_community(&id, name, description)
            }
            Err(e) => {
                warn!(error = %e, "could not fetch full community data, using inputs");
                synthesized_community(&id, name, description)
            }
        };
        self.add_community(community.clone());
        Ok(community)
    }

    /// Join `community` as `user`.
    ///
    /// Uses the membership id from the response when present, otherwise a
    /// temporary `temp-` id. Joining twice does not duplicate the membership.
    pub async fn join_community(
        &mut self,
        session: Option<&Session>,
        community: &EntityId,
        user: &EntityId,
    ) -> Result<Membership, CoreError> {
        let session = self.status.require_session(session)?;
        self.status.begin();
        let outcome = self
            .api
            .add_member(session.id.as_str(), community.as_str(), user.as_str())
            .await;
        let result = match outcome {
            Ok(id) => Ok(self.record_join(community, user, id)),
            Err(e) => Err(CoreError::from(e)),
        };
        self.status.settle(&result, "Failed to join community");
        result
    }

    fn record_join(&mut self, community: &EntityId, user: &EntityId, id: Option<String>) -> Membership {
        if let Some(existing) = self.membership_for(community, user) {
            return existing.clone();
        }
        let id = id.unwrap_or_else(|| format!("temp-{}", Uuid::new_v4()));
        let membership = Membership {
            id: id.into(),
            user: user.clone(),
            community: community.clone(),
            role: Role::Member,
            join_date: Some(Utc::now()),
        };
        self.add_membership(membership.clone());
        let link = |c: &mut Community| {
            if !c.memberships.contains(&membership.id) {
                c.memberships.push(membership.id.clone());
            }
        };
        self.communities.update_with(community, link);
        if let Some(current) = self.current.as_mut().filter(|c| c.id == *community) {
            link(current);
        }
        membership
    }

    pub async fn leave_community(
        &mut self,
        session: Option<&Session>,
        community: &EntityId,
        user: &EntityId,
    ) -> Result<(), CoreError> {
        let session = self.status.require_session(session)?;
        self.status.begin();
        let result = self
            .api
            .remove_member(session.id.as_str(), community.as_str(), user.as_str())
            .await
            .map_err(CoreError::from);
        let leaving = self.membership_for(community, user).map(|m| m.id.clone());
        if let (Ok(()), Some(id)) = (&result, leaving) {
            self.remove_membership(&id);
        }
        self.status.settle(&result, "Failed to leave community");
        result
    }

    pub async fn update_community_details(
        &mut self,
        session: Option<&Session>,
        community: &EntityId,
        name: &str,
        description: &str,
        requester: &EntityId,
    ) -> Result<(), CoreError> {
        let session = self.status.require_session(session)?;
        self.status.begin();
        let result = self
            .api
            .update_community_details(
                session.id.as_str(),
                community.as_str(),
                name,
                description,
                requester.as_str(),
            )
            .await
            .map_err(CoreError::from);
        if result.is_ok() {
            self.update_community(
                community,
                &CommunityPatch {
                    name: Some(name.to_owned()),
                    description: Some(description.to_owned()),
                    ..CommunityPatch::default()
                },
            );
        }
        self.status.settle(&result, "Failed to update community");
        result
    }

    pub async fn set_member_role(
        &mut self,
        session: Option<&Session>,
        membership: &EntityId,
        role: Role,
        requester: &EntityId,
    ) -> Result<(), CoreError> {
        let session = self.status.require_session(session)?;
        self.status.begin();
        let result = self
            .api
            .set_member_role(
                session.id.as_str(),
                membership.as_str(),
                &role.to_string(),
                requester.as_str(),
            )
            .await
            .map_err(CoreError::from);
        if result.is_ok() {
            self.update_membership(membership, &MembershipPatch { role: Some(role) });
        }
        self.status.settle(&result, "Failed to set member role");
        result
    }

    pub async fn delete_community(
        &mut self,
        session: Option<&Session>,
        community: &EntityId,
        requester: &EntityId,
    ) -> Result<(), CoreError> {
        let session = self.status.require_session(session)?;
        self.status.begin();
        let result = self
            .api
            .delete_community(session.id.as_str(), community.as_str(), requester.as_str())
            .await
            .map_err(CoreError::from);
        if result.is_ok() {
            self.remove_community(community);
        }
        self.status.settle(&result, "Failed to delete community");
        result
    }

    pub(crate) fn reset(&mut self) {
        self.communities.clear();
        self.memberships.clear();
        self.current = None;
        self.status.reset();
    }
}

fn synthesized_community(id: &str, name: &str, description: &str) -> Community {
    Community {
        id: id.into(),
        name: name.to_owned(),
        description: description.to_owned(),
        creation_date: Some(Utc::now()),
        memberships: Vec::new(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use studycircle_api::{HttpClient, MemoryStorage, TransportConfig};
    use url::Url;

    fn store() -> CommunityStore {
        let http = HttpClient::new(
            Url::parse("http://127.0.0.1:9/api").unwrap(),
            &TransportConfig::default(),
            Arc::new(MemoryStorage::new()),
        )
        .unwrap();
        CommunityStore::new(RpcClient::new(http))
    }

    fn community(id: &str, memberships: &[&str]) -> Community {
        Community {
            id: id.into(),
            name: id.to_uppercase(),
            description: String::new(),
            creation_date: None,
            memberships: memberships.iter().map(|m| EntityId::from(*m)).collect(),
        }
    }

    fn membership(id: &str, user: &str, community: &str, role: Role) -> Membership {
        Membership {
            id: id.into(),
            user: user.into(),
            community: community.into(),
            role,
            join_date: None,
        }
    }

    #[test]
    fn removing_community_removes_exactly_its_memberships() {
        let mut store = store();
        store.set_communities(vec![community("c1", &["m1"]), community("c2", &["m2"])]);
        store.set_memberships(vec![
            membership("m1", "u1", "c1", Role::Admin),
            membership("m2", "u1", "c2", Role::Member),
            membership("m3", "u2", "c1", Role::Member),
        ]);
        store.set_current_community(Some(community("c1", &["m1"])));

        store.remove_community(&"c1".into());

        let ids: Vec<_> = store.memberships().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["m2"]);
        assert!(store.current_community().is_none());
    }

    #[test]
    fn removing_membership_unlinks_from_community() {
        let mut store = store();
        store.set_communities(vec![community("c1", &["m1", "m3"])]);
        store.set_memberships(vec![
            membership("m1", "u1", "c1", Role::Admin),
            membership("m3", "u2", "c1", Role::Member),
        ]);
        store.remove_membership(&"m3".into());
        let c1 = store.communities().get(&"c1".into()).unwrap();
        assert_eq!(c1.memberships, vec![EntityId::from("m1")]);
    }

    #[test]
    fn membership_views() {
        let mut store = store();
        store.set_communities(vec![community("c1", &[]), community("c2", &[]), community("c3", &[])]);
        store.set_memberships(vec![
            membership("m1", "u1", "c1", Role::Admin),
            membership("m2", "u1", "c2", Role::Member),
            membership("m3", "u2", "c3", Role::Admin),
        ]);
        let u1: EntityId = "u1".into();

        let mine: Vec<_> = store.user_communities(&u1).into_iter().map(|c| c.id).collect();
        assert_eq!(mine, vec![EntityId::from("c1"), EntityId::from("c2")]);
        let admin: Vec<_> = store.admin_communities(&u1).into_iter().map(|c| c.id).collect();
        assert_eq!(admin, vec![EntityId::from("c1")]);
        assert!(store.is_user_admin(&"c1".into(), &u1));
        assert!(!store.is_user_admin(&"c2".into(), &u1));
        assert!(!store.is_user_admin(&"c3".into(), &u1));
        assert_eq!(store.community_members(&"c3".into()).len(), 1);
    }

    #[test]
    fn repeat_join_is_not_duplicated() {
        let mut store = store();
        store.set_communities(vec![community("c1", &[])]);
        let first = store.record_join(&"c1".into(), &"u1".into(), None);
        let second = store.record_join(&"c1".into(), &"u1".into(), Some("m9".into()));
        assert_eq!(first.id, second.id);
        assert!(first.id.as_str().starts_with("temp-"));
        assert_eq!(store.memberships().len(), 1);
        assert_eq!(store.communities().get(&"c1".into()).unwrap().memberships.len(), 1);
    }

    #[test]
    fn update_unknown_community_is_noop() {
        let mut store = store();
        store.set_communities(vec![community("c1", &[])]);
        store.update_community(
            &"zz".into(),
            &CommunityPatch {
                name: Some("x".into()),
                ..CommunityPatch::default()
            },
        );
        assert_eq!(store.communities().get(&"c1".into()).unwrap().name, "C1");
    }
}
