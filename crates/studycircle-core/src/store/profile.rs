// ── Profile store ──
//
// All known profiles plus the signed-in user's own. One profile per
// user: inserting a profile for a user that already has one replaces it.

use tracing::debug;

use studycircle_api::RpcClient;

use crate::error::CoreError;
use crate::model::{Entity, EntityId, ProfilePatch, Session, UserProfile};
use crate::store::collection::EntityCollection;
use crate::store::status::StoreStatus;

pub struct ProfileStore {
    api: RpcClient,
    profiles: EntityCollection<UserProfile>,
    current: Option<UserProfile>,
    pub(crate) status: StoreStatus,
}

impl ProfileStore {
    pub fn new(api: RpcClient) -> Self {
        Self {
            api,
            profiles: EntityCollection::new(),
            current: None,
            status: StoreStatus::default(),
        }
    }

    pub(crate) fn api(&self) -> &RpcClient {
        &self.api
    }

    // ── Views ────────────────────────────────────────────────────────

    pub fn status(&self) -> &StoreStatus {
        &self.status
    }

    pub fn profiles(&self) -> &EntityCollection<UserProfile> {
        &self.profiles
    }

    pub fn current_profile(&self) -> Option<&UserProfile> {
        self.current.as_ref()
    }

    pub fn has_profile(&self) -> bool {
        self.current.is_some()
    }

    pub fn display_name(&self) -> &str {
        self.current.as_ref().map_or("", |p| p.display_name.as_str())
    }

    pub fn bio(&self) -> &str {
        self.current.as_ref().map_or("", |p| p.bio.as_str())
    }

    pub fn thumbnail_image_url(&self) -> &str {
        self.current.as_ref().map_or("", |p| p.thumbnail_image_url.as_str())
    }

    pub fn profile_for_user(&self, user: &EntityId) -> Option<&UserProfile> {
        self.profiles.find(|p| p.user == *user)
    }

    // ── Mutators ─────────────────────────────────────────────────────

    pub fn set_current_profile(&mut self, profile: Option<UserProfile>) {
        self.current = profile;
    }

    pub fn clear_profile(&mut self) {
        self.current = None;
    }

    pub fn set_profiles(&mut self, profiles: Vec<UserProfile>) {
        let mut unique: Vec<UserProfile> = Vec::with_capacity(profiles.len());
        for profile in profiles {
            match unique.iter_mut().find(|p| p.user == profile.user) {
                Some(existing) => *existing = profile,
                None => unique.push(profile),
            }
        }
        self.profiles.set_all(unique);
    }

    /// Insert a profile, replacing any other profile owned by the same user.
    pub fn add_profile(&mut self, profile: UserProfile) {
        let user = profile.user.clone();
        let id = profile.id.clone();
        self.profiles.retain(|p| p.user != user && p.id != id);
        self.profiles.push(profile);
    }

    pub fn update_profile(&mut self, id: &EntityId, patch: &ProfilePatch) {
        self.profiles.update(id, patch);
        if let Some(current) = self.current.as_mut().filter(|p| p.id == *id) {
            current.apply(patch);
        }
    }

    pub fn remove_profile(&mut self, id: &EntityId) {
        self.profiles.remove(id);
        if self.current.as_ref().is_some_and(|p| p.id == *id) {
            self.current = None;
        }
    }

    // ── API operations ───────────────────────────────────────────────

    /// Fetch the profile owned by `user` and cache it.
    ///
    /// A user without a profile yields `Ok(None)` and records no error.
    pub async fn fetch_profile_by_user(
        &mut self,
        user: &EntityId,
    ) -> Result<Option<UserProfile>, CoreError> {
        self.status.begin();
        let result = match self.api.get_profile(user.as_str()).await {
            Ok(record) => Ok(record.map(UserProfile::from)),
            Err(e) => {
                let err = CoreError::from(e);
                if err.is_not_found() { Ok(None) } else { Err(err) }
            }
        };
        if let Ok(Some(profile)) = &result {
            self.add_profile(profile.clone());
        }
        self.status.settle(&result, "Failed to fetch profile");
        result
    }

    /// Fetch every profile, replacing the cache.
    pub async fn fetch_all_profiles(&mut self) {
        self.status.begin();
        match self.api.list_profiles().await {
            Ok(records) => {
                debug!(count = records.len(), "profiles fetched");
                self.set_profiles(records.into_iter().map(UserProfile::from).collect());
            }
            Err(e) => self.status.record(&e.into(), "Failed to fetch profiles"),
        }
        self.status.finish();
    }

    /// Create a profile for `user`; it becomes the current profile.
    pub async fn create_profile(
        &mut self,
        session: Option<&Session>,
        user: &EntityId,
        display_name: &str,
        bio: &str,
        thumbnail_image_url: &str,
    ) -> Result<UserProfile, CoreError> {
        let session = self.status.require_session(session)?;
        self.status.begin();
        let result = self
            .create_profile_inner(session, user, display_name, bio, thumbnail_image_url)
            .await;
        self.status.settle(&result, "Failed to create profile");
        result
    }

    async fn create_profile_inner(
        &mut self,
        session: &Session,
        user: &EntityId,
        display_name: &str,
        bio: &str,
        thumbnail_image_url: &str,
    ) -> Result<UserProfile, CoreError> {
        let id = self
            .api
            .create_profile(
                session.id.as_str(),
                user.as_str(),
                display_name,
                bio,
                thumbnail_image_url,
            )
            .await?;

        let fetched = match self.api.get_profile(user.as_str()).await {
            Ok(Some(record)) if record.id == id => Some(UserProfile::from(record)),
            Ok(_) => None,
            Err(e) => {
                debug!(error = %e, "profile detail fetch failed, using inputs");
                None
            }
        };
        let profile = fetched.unwrap_or_else(|| UserProfile {
            id: id.into(),
            user: user.clone(),
            display_name: display_name.to_owned(),
            bio: bio.to_owned(),
            thumbnail_image_url: thumbnail_image_url.to_owned(),
        });

        self.add_profile(profile.clone());
        self.current = Some(profile.clone());
        Ok(profile)
    }

    pub async fn update_display_name(
        &mut self,
        session: Option<&Session>,
        profile: &EntityId,
        display_name: &str,
    ) -> Result<(), CoreError> {
        let session = self.status.require_session(session)?;
        self.status.begin();
        let result = self
            .api
            .update_display_name(session.id.as_str(), profile.as_str(), display_name)
            .await
            .map_err(CoreError::from);
        if result.is_ok() {
            self.update_profile(
                profile,
                &ProfilePatch {
                    display_name: Some(display_name.to_owned()),
                    ..ProfilePatch::default()
                },
            );
        }
        self.status.settle(&result, "Failed to update display name");
        result
    }

    pub async fn update_bio(
        &mut self,
        session: Option<&Session>,
        profile: &EntityId,
        bio: &str,
    ) -> Result<(), CoreError> {
        let session = self.status.require_session(session)?;
        self.status.begin();
        let result = self
            .api
            .update_bio(session.id.as_str(), profile.as_str(), bio)
            .await
            .map_err(CoreError::from);
        if result.is_ok() {
            self.update_profile(
                profile,
                &ProfilePatch {
                    bio: Some(bio.to_owned()),
                    ..ProfilePatch::default()
                },
            );
        }
        self.status.settle(&result, "Failed to update bio");
        result
    }

    pub async fn update_thumbnail_image(
        &mut self,
        session: Option<&Session>,
        profile: &EntityId,
        url: &str,
    ) -> Result<(), CoreError> {
        let session = self.status.require_session(session)?;
        self.status.begin();
        let result = self
            .api
            .update_thumbnail_image(session.id.as_str(), profile.as_str(), url)
            .await
            .map_err(CoreError::from);
        if result.is_ok() {
            self.update_profile(
                profile,
                &ProfilePatch {
                    thumbnail_image_url: Some(url.to_owned()),
                    ..ProfilePatch::default()
                },
            );
        }
        self.status.settle(&result, "Failed to update thumbnail image");
        result
    }

    pub async fn delete_profile(
        &mut self,
        session: Option<&Session>,
        profile: &EntityId,
    ) -> Result<(), CoreError> {
        let session = self.status.require_session(session)?;
        self.status.begin();
        let result = self
            .api
            .delete_profile(session.id.as_str(), profile.as_str())
            .await
            .map_err(CoreError::from);
        if result.is_ok() {
            self.remove_profile(profile);
        }
        self.status.settle(&result, "Failed to delete profile");
        result
    }

    pub(crate) fn reset(&mut self) {
        self.profiles.clear();
        self.current = None;
        self.status.reset();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use studycircle_api::{HttpClient, MemoryStorage, TransportConfig};
    use url::Url;

    fn store() -> ProfileStore {
        let http = HttpClient::new(
            Url::parse("http://127.0.0.1:9/api").unwrap(),
            &TransportConfig::default(),
            Arc::new(MemoryStorage::new()),
        )
        .unwrap();
        ProfileStore::new(RpcClient::new(http))
    }

    fn profile(id: &str, user: &str, name: &str) -> UserProfile {
        UserProfile {
            id: id.into(),
            user: user.into(),
            display_name: name.into(),
            bio: String::new(),
            thumbnail_image_url: String::new(),
        }
    }

    #[test]
    fn one_profile_per_user() {
        let mut store = store();
        store.add_profile(profile("p1", "u1", "Ada"));
        store.add_profile(profile("p2", "u1", "Ada L."));
        assert_eq!(store.profiles().len(), 1);
        assert_eq!(store.profile_for_user(&"u1".into()).unwrap().id, "p2");
    }

    #[test]
    fn update_applies_to_current_selection() {
        let mut store = store();
        store.add_profile(profile("p1", "u1", "Ada"));
        store.set_current_profile(Some(profile("p1", "u1", "Ada")));
        store.update_profile(
            &"p1".into(),
            &ProfilePatch {
                bio: Some("math".into()),
                ..ProfilePatch::default()
            },
        );
        assert_eq!(store.bio(), "math");
        assert_eq!(store.profiles().get(&"p1".into()).unwrap().bio, "math");
    }

    #[test]
    fn remove_clears_current_on_match() {
        let mut store = store();
        store.add_profile(profile("p1", "u1", "Ada"));
        store.set_current_profile(Some(profile("p1", "u1", "Ada")));
        store.remove_profile(&"p1".into());
        assert!(!store.has_profile());
        assert_eq!(store.display_name(), "");
    }

    #[test]
    fn authenticated_ops_require_session() {
        let mut store = store();
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let err = rt
            .block_on(store.update_bio(None, &"p1".into(), "x"))
            .unwrap_err();
        assert!(matches!(err, CoreError::NotLoggedIn));
        assert_eq!(
            store.status().error(),
            Some("You must be logged in to perform this action")
        );
    }
}
