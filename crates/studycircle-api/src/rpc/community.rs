// RPC API community and membership endpoints
//
// Mutations that act on behalf of an admin carry a `requester` user id in
// addition to the session; the backend checks the requester's role.

use serde_json::{Value, json};
use tracing::debug;

use crate::error::Error;
use crate::rpc::client::RpcClient;
use crate::rpc::models::{CommunityRecord, MembershipRecord};
use crate::rpc::normalize;

const CONCEPT: &str = "Community";

impl RpcClient {
    /// Create a community and return its id.
    ///
    /// `POST /Community/createCommunity`
    pub async fn create_community(
        &self,
        session: &str,
        name: &str,
        description: &str,
        creator: &str,
    ) -> Result<String, Error> {
        debug!(name, creator, "creating community");
        self.call_for_id(
            CONCEPT,
            "createCommunity",
            "community",
            json!({
                "session": session,
                "name": name,
                "description": description,
                "creator": creator,
            }),
        )
        .await
    }

    /// `POST /Community/updateCommunityDetails`
    pub async fn update_community_details(
        &self,
        session: &str,
        community: &str,
        new_name: &str,
        new_description: &str,
        requester: &str,
    ) -> Result<(), Error> {
        debug!(community, "updating community details");
        self.call_unit(
            CONCEPT,
            "updateCommunityDetails",
            json!({
                "session": session,
                "community": community,
                "newName": new_name,
                "newDescription": new_description,
                "requester": requester,
            }),
        )
        .await
    }

    /// `POST /Community/deleteCommunity`
    pub async fn delete_community(
        &self,
        session: &str,
        community: &str,
        requester: &str,
    ) -> Result<(), Error> {
        debug!(community, "deleting community");
        self.call_unit(
            CONCEPT,
            "deleteCommunity",
            json!({ "session": session, "community": community, "requester": requester }),
        )
        .await
    }

    /// Add `user` to a community.
    ///
    /// `POST /Community/addMember`. Returns the membership id when the
    /// backend reports one; some deployments reply with an empty body.
    pub async fn add_member(
        &self,
        session: &str,
        community: &str,
        user: &str,
    ) -> Result<Option<String>, Error> {
        debug!(community, user, "adding member");
        let value = self
            .call(
                CONCEPT,
                "addMember",
                json!({ "session": session, "community": community, "user": user }),
            )
            .await?;
        Ok(optional_id(&value, "membership"))
    }

    /// `POST /Community/removeMember`
    pub async fn remove_member(&self, session: &str, community: &str, user: &str) -> Result<(), Error> {
        debug!(community, user, "removing member");
        self.call_unit(
            CONCEPT,
            "removeMember",
            json!({ "session": session, "community": community, "user": user }),
        )
        .await
    }

    /// `POST /Community/setMemberRole` with `newRole` of `ADMIN` or `MEMBER`.
    pub async fn set_member_role(
        &self,
        session: &str,
        membership: &str,
        new_role: &str,
        requester: &str,
    ) -> Result<(), Error> {
        debug!(membership, new_role, "setting member role");
        self.call_unit(
            CONCEPT,
            "setMemberRole",
            json!({
                "session": session,
                "membership": membership,
                "newRole": new_role,
                "requester": requester,
            }),
        )
        .await
    }

    /// `POST /Community/_getCommunityById`
    pub async fn get_community(&self, community: &str) -> Result<Option<CommunityRecord>, Error> {
        debug!(community, "fetching community");
        self.query_one(
            CONCEPT,
            "_getCommunityById",
            "community",
            json!({ "community": community }),
        )
        .await
    }

    /// `POST /Community/_getAllCommunities`
    pub async fn list_communities(&self) -> Result<Vec<CommunityRecord>, Error> {
        debug!("listing communities");
        self.query_list(CONCEPT, "_getAllCommunities", "community", json!({}))
            .await
    }

    /// `POST /Community/_getAllMemberships`
    pub async fn list_memberships(&self) -> Result<Vec<MembershipRecord>, Error> {
        debug!("listing memberships");
        self.query_list(CONCEPT, "_getAllMemberships", "membership", json!({}))
            .await
    }

    /// `POST /Community/_getMembershipsForUser`
    pub async fn list_memberships_for_user(&self, user: &str) -> Result<Vec<MembershipRecord>, Error> {
        debug!(user, "listing memberships for user");
        self.query_list(
            CONCEPT,
            "_getMembershipsForUser",
            "membership",
            json!({ "user": user }),
        )
        .await
    }
}

fn optional_id(value: &Value, field: &'static str) -> Option<String> {
    normalize::id_field(value, field).ok()
}
