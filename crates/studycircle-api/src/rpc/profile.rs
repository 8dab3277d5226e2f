// RPC API user profile endpoints

use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::rpc::client::RpcClient;
use crate::rpc::models::ProfileRecord;

const CONCEPT: &str = "UserProfile";

impl RpcClient {
    /// Create a profile for `user` and return the new profile id.
    ///
    /// `POST /UserProfile/createProfile`
    pub async fn create_profile(
        &self,
        session: &str,
        user: &str,
        display_name: &str,
        bio: &str,
        thumbnail_image_url: &str,
    ) -> Result<String, Error> {
        debug!(user, display_name, "creating profile");
        self.call_for_id(
            CONCEPT,
            "createProfile",
            "profile",
            json!({
                "session": session,
                "user": user,
                "displayName": display_name,
                "bio": bio,
                "thumbnailImageURL": thumbnail_image_url,
            }),
        )
        .await
    }

    /// `POST /UserProfile/updateDisplayName`
    pub async fn update_display_name(
        &self,
        session: &str,
        profile: &str,
        new_display_name: &str,
    ) -> Result<(), Error> {
        debug!(profile, "updating display name");
        self.call_unit(
            CONCEPT,
            "updateDisplayName",
            json!({ "session": session, "profile": profile, "newDisplayName": new_display_name }),
        )
        .await
    }

    /// `POST /UserProfile/updateBio`
    pub async fn update_bio(&self, session: &str, profile: &str, new_bio: &str) -> Result<(), Error> {
        debug!(profile, "updating bio");
        self.call_unit(
            CONCEPT,
            "updateBio",
            json!({ "session": session, "profile": profile, "newBio": new_bio }),
        )
        .await
    }

    /// `POST /UserProfile/updateThumbnailImage`
    pub async fn update_thumbnail_image(
        &self,
        session: &str,
        profile: &str,
        new_thumbnail_image_url: &str,
    ) -> Result<(), Error> {
        debug!(profile, "updating thumbnail image");
        self.call_unit(
            CONCEPT,
            "updateThumbnailImage",
            json!({
                "session": session,
                "profile": profile,
                "newThumbnailImageURL": new_thumbnail_image_url,
            }),
        )
        .await
    }

    /// `POST /UserProfile/deleteProfile`
    pub async fn delete_profile(&self, session: &str, profile: &str) -> Result<(), Error> {
        debug!(profile, "deleting profile");
        self.call_unit(
            CONCEPT,
            "deleteProfile",
            json!({ "session": session, "profile": profile }),
        )
        .await
    }

    /// Fetch the profile owned by `user`.
    ///
    /// `POST /UserProfile/_getProfile`. A 404, an empty result, or a
    /// "not found" application error all resolve to `Ok(None)`.
    pub async fn get_profile(&self, user: &str) -> Result<Option<ProfileRecord>, Error> {
        debug!(user, "fetching profile");
        match self
            .query_one(CONCEPT, "_getProfile", "profile", json!({ "user": user }))
            .await
        {
            Err(e) if e.is_not_found() => Ok(None),
            other => other,
        }
    }

    /// `POST /UserProfile/_getAllProfiles`
    pub async fn list_profiles(&self) -> Result<Vec<ProfileRecord>, Error> {
        debug!("listing profiles");
        self.query_list(CONCEPT, "_getAllProfiles", "profile", json!({}))
            .await
    }
}
