// ── Profile lookup helper ──
//
// Resolves author ids to display names and avatars for lists of posts,
// replies, and members. Missing profiles are fetched in one concurrent
// batch; results land in the profile store so later lookups are local.

use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::model::{EntityId, UserProfile};
use crate::store::ProfileStore;

/// Shown when there is no user id at all.
pub const UNKNOWN_USER: &str = "Unknown User";

/// Borrowing view over the profile store with batch fetching.
pub struct ProfileLookup<'a> {
    profiles: &'a mut ProfileStore,
    loading: bool,
}

impl<'a> ProfileLookup<'a> {
    pub fn new(profiles: &'a mut ProfileStore) -> Self {
        Self {
            profiles,
            loading: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Fetch profiles for every listed user not already cached.
    ///
    /// Ids are deduplicated (first occurrence wins). Per-user failures are
    /// logged and skipped; users without a profile are simply absent.
    pub async fn fetch_profiles_for_users(&mut self, users: &[EntityId]) {
        if users.is_empty() {
            return;
        }
        self.loading = true;

        let mut missing: Vec<EntityId> = Vec::new();
        for user in users {
            if !missing.contains(user) && self.profiles.profile_for_user(user).is_none() {
                missing.push(user.clone());
            }
        }
        debug!(requested = users.len(), fetching = missing.len(), "fetching profiles");

        let api = self.profiles.api().clone();
        let fetches = missing.into_iter().map(|user| {
            let api = api.clone();
            async move {
                let result = api.get_profile(user.as_str()).await;
                (user, result)
            }
        });

        for (user, result) in join_all(fetches).await {
            match result {
                Ok(Some(record)) => self.profiles.add_profile(UserProfile::from(record)),
                Ok(None) => debug!(%user, "user has no profile"),
                Err(e) => warn!(%user, error = %e, "failed to fetch profile"),
            }
        }

        self.loading = false;
    }

    // ── Derivations ──────────────────────────────────────────────────

    pub fn profile(&self, user: Option<&EntityId>) -> Option<&UserProfile> {
        user.and_then(|u| self.profiles.profile_for_user(u))
    }

    pub fn has_profile(&self, user: Option<&EntityId>) -> bool {
        self.profile(user).is_some()
    }

    /// Display name, or `User <first 8 chars>` when the profile is missing
    /// or unnamed.
    pub fn display_name(&self, user: Option<&EntityId>) -> String {
        let Some(user) = user else {
            return UNKNOWN_USER.to_owned();
        };
        match self.profiles.profile_for_user(user) {
            Some(p) if !p.display_name.is_empty() => p.display_name.clone(),
            _ => format!("User {}", user.prefix(8)),
        }
    }

    /// Avatar URL, `None` when absent or empty.
    pub fn avatar_url(&self, user: Option<&EntityId>) -> Option<&str> {
        self.profile(user)
            .map(|p| p.thumbnail_image_url.as_str())
            .filter(|url| !url.is_empty())
    }
}

/// Initials for an avatar placeholder: first and last word, or the first
/// letter of a single word, uppercased. `?` for an empty name.
pub fn initials(name: Option<&str>) -> String {
    let words: Vec<&str> = name.unwrap_or_default().split_whitespace().collect();
    let first_char = |w: &str| w.chars().next().into_iter().flat_map(char::to_uppercase);
    match words.as_slice() {
        [] => "?".to_owned(),
        [only] => first_char(*only).collect(),
        [first, .., last] => first_char(*first).chain(first_char(*last)).collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn initials_cover_common_shapes() {
        assert_eq!(initials(Some("Sarah Johnson")), "SJ");
        assert_eq!(initials(Some("ada  byron lovelace")), "AL");
        assert_eq!(initials(Some("ada")), "A");
        assert_eq!(initials(Some("   ")), "?");
        assert_eq!(initials(None), "?");
    }
}
