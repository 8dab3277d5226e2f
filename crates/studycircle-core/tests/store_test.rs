#![allow(clippy::unwrap_used)]
// Store-level integration tests against a mocked backend.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use studycircle_api::{FileStorage, MemoryStorage, Storage, TOKEN_KEY};
use studycircle_core::{ClientConfig, CoreError, EntityId, Hub, NOT_LOGGED_IN, Session};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Hub) {
    let server = MockServer::start().await;
    let hub = hub_for(&server, Arc::new(MemoryStorage::new()));
    (server, hub)
}

fn hub_for(server: &MockServer, storage: Arc<dyn Storage>) -> Hub {
    let base_url = Url::parse(&format!("{}/api", server.uri())).unwrap();
    Hub::new(ClientConfig::new(base_url), storage).unwrap()
}

/// Accepts every key except the bearer token.
#[derive(Default)]
struct TokenlessStorage(MemoryStorage);

impl Storage for TokenlessStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), studycircle_api::Error> {
        if key == TOKEN_KEY {
            return Err(studycircle_api::Error::Storage("disk full".into()));
        }
        self.0.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), studycircle_api::Error> {
        self.0.remove(key)
    }
}

fn rpc_path(concept: &str, action: &str) -> String {
    format!("/api/{concept}/{action}")
}

fn session() -> Session {
    Session {
        id: "s1".into(),
        user: "u1".into(),
        expiry: None,
    }
}

fn ids(values: &[&str]) -> Vec<EntityId> {
    values.iter().map(|v| EntityId::from(*v)).collect()
}

// ── Communities ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_community_falls_back_to_inputs_when_detail_fetch_fails() {
    let (server, mut hub) = setup().await;

    Mock::given(method("POST"))
        .and(path(rpc_path("Community", "createCommunity")))
        .and(body_partial_json(json!({ "session": "s1", "name": "Algorithms Study" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "community": "c1" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(rpc_path("Community", "_getCommunityById")))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "boom" })))
        .mount(&server)
        .await;

    let session = session();
    let store = &mut hub.stores.community;
    let created = store
        .create_community(
            Some(&session),
            "Algorithms Study",
            "Weekly problem sets",
            &"u1".into(),
        )
        .await
        .unwrap();

    assert_eq!(created.id.as_str(), "c1");
    assert_eq!(store.communities().len(), 1);
    let cached = store.communities().get(&"c1".into()).unwrap();
    assert_eq!(cached.name, "Algorithms Study");
    assert_eq!(cached.description, "Weekly problem sets");
    assert!(cached.memberships.is_empty());
    assert!(cached.creation_date.is_some());
    assert!(!store.status().is_loading());
    assert_eq!(store.status().error(), None);
}

#[tokio::test]
async fn test_authenticated_operation_without_session_makes_no_request() {
    let (server, mut hub) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "community": "c1" })))
        .expect(0)
        .mount(&server)
        .await;

    let store = &mut hub.stores.community;
    let err = store
        .create_community(None, "Algorithms Study", "Weekly problem sets", &"u1".into())
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::NotLoggedIn));
    assert_eq!(store.status().error(), Some(NOT_LOGGED_IN));
    assert!(store.communities().is_empty());
}

#[tokio::test]
async fn test_join_community_twice_keeps_one_membership() {
    let (server, mut hub) = setup().await;

    Mock::given(method("POST"))
        .and(path(rpc_path("Community", "addMember")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "membership": "m1" })))
        .mount(&server)
        .await;

    let session = session();
    let store = &mut hub.stores.community;
    let first = store
        .join_community(Some(&session), &"c1".into(), &"u1".into())
        .await
        .unwrap();
    let second = store
        .join_community(Some(&session), &"c1".into(), &"u1".into())
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(store.memberships().len(), 1);
    assert_eq!(first.id.as_str(), "m1");
    assert!(store.membership_for(&"c1".into(), &"u1".into()).is_some());
}

#[tokio::test]
async fn test_fetch_failure_records_error_and_clears_loading() {
    let (server, mut hub) = setup().await;

    Mock::given(method("POST"))
        .and(path(rpc_path("Community", "_getAllCommunities")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "db offline" })))
        .mount(&server)
        .await;

    let store = &mut hub.stores.community;
    store.fetch_communities().await;

    assert!(!store.status().is_loading());
    assert_eq!(store.status().error(), Some("db offline"));
}

// ── Enrollments ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_add_enrollment_records_exactly_one() {
    let (server, mut hub) = setup().await;

    Mock::given(method("POST"))
        .and(path(rpc_path("UserEnrollments", "addEnrollment")))
        .and(body_partial_json(json!({
            "owner": "u1", "course": "c9", "section": "s3", "visibility": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "enrollment": "e1" })))
        .expect(1)
        .mount(&server)
        .await;

    let session = session();
    let store = &mut hub.stores.enrollment;
    let enrollment = store
        .add_enrollment(Some(&session), &"u1".into(), &"c9".into(), &"s3".into(), true)
        .await
        .unwrap();

    assert_eq!(enrollment.id.as_str(), "e1");
    assert_eq!(store.enrollment_count(), 1);
    assert_eq!(store.user_visible_enrollments(&"u1".into()).len(), 1);
}

#[tokio::test]
async fn test_enrollment_fetch_merges_with_local_additions() {
    let (server, mut hub) = setup().await;

    Mock::given(method("POST"))
        .and(path(rpc_path("UserEnrollments", "addEnrollment")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "enrollment": "e1" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(rpc_path("UserEnrollments", "_getEnrollmentsByOwner")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": "e1", "owner": "u1", "course": "c9", "section": "s4", "visibility": true },
            { "_id": "e2", "owner": "u1", "course": "c2", "section": "s1", "visibility": false }
        ])))
        .mount(&server)
        .await;

    let session = session();
    let store = &mut hub.stores.enrollment;
    store
        .add_enrollment(Some(&session), &"u1".into(), &"c9".into(), &"s3".into(), true)
        .await
        .unwrap();
    store.fetch_enrollments_for_owner(&"u1".into()).await;

    assert_eq!(store.enrollment_count(), 2);
    let e1 = store.enrollments().get(&"e1".into()).unwrap();
    assert_eq!(e1.section.as_str(), "s4");
    assert_eq!(store.visible_enrollments().len(), 1);
}

// ── Profiles ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_profile_lookup_fetches_each_user_once() {
    let (server, mut hub) = setup().await;

    for user in ["u1", "u2"] {
        Mock::given(method("POST"))
            .and(path(rpc_path("UserProfile", "_getProfile")))
            .and(body_partial_json(json!({ "user": user })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "profile": {
                    "_id": format!("p-{user}"),
                    "user": user,
                    "displayName": format!("Name {user}"),
                    "thumbnailImageURL": ""
                }
            }])))
            .expect(1)
            .mount(&server)
            .await;
    }

    let users = ids(&["u1", "u2", "u1"]);
    let mut lookup = hub.profile_lookup();
    lookup.fetch_profiles_for_users(&users).await;
    lookup.fetch_profiles_for_users(&users).await;

    assert!(!lookup.is_loading());
    assert_eq!(lookup.display_name(Some(&"u2".into())), "Name u2");
    assert_eq!(lookup.avatar_url(Some(&"u1".into())), None);
    assert_eq!(hub.stores.profile.profiles().len(), 2);
}

#[tokio::test]
async fn test_missing_profile_is_none_without_error() {
    let (server, mut hub) = setup().await;

    Mock::given(method("POST"))
        .and(path(rpc_path("UserProfile", "_getProfile")))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "error": "Profile not found" })),
        )
        .mount(&server)
        .await;

    let store = &mut hub.stores.profile;
    let profile = store.fetch_profile_by_user(&"u7".into()).await.unwrap();

    assert!(profile.is_none());
    assert_eq!(store.status().error(), None);
    assert!(!store.status().is_loading());
}

// ── Auth & persistence ──────────────────────────────────────────────

#[tokio::test]
async fn test_login_persists_and_new_hub_restores_it() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("state.json");

    Mock::given(method("POST"))
        .and(path(rpc_path("UserAuthentication", "login")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": { "_id": "u1", "username": "ada" },
            "session": "s1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut hub = hub_for(&server, Arc::new(FileStorage::open(&state)));
    hub.login("ada", &SecretString::from("pw")).await.unwrap();
    assert_eq!(hub.session().unwrap().id.as_str(), "s1");
    assert_eq!(hub.rpc().http().token().as_deref(), Some("s1"));
    drop(hub);

    let restored = hub_for(&server, Arc::new(FileStorage::open(&state)));
    assert!(restored.stores.auth.is_logged_in());
    assert_eq!(restored.stores.auth.username(), Some("ada"));
}

#[tokio::test]
async fn test_rejected_session_is_not_restored() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("state.json");

    Mock::given(method("POST"))
        .and(path(rpc_path("UserAuthentication", "login")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": { "_id": "u1", "username": "ada" },
            "session": "s1"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(rpc_path("Community", "_getAllCommunities")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "session expired" })))
        .expect(1)
        .mount(&server)
        .await;

    let mut hub = hub_for(&server, Arc::new(FileStorage::open(&state)));
    hub.login("ada", &SecretString::from("pw")).await.unwrap();
    assert!(hub.stores.auth.is_logged_in());

    hub.stores.community.fetch_communities().await;
    let status = hub.stores.community.status();
    assert_eq!(status.error(), Some("session expired"));
    assert!(status.login_expired());

    // The token is gone, so the session no longer counts.
    assert!(hub.rpc().http().token().is_none());
    assert!(!hub.stores.auth.is_logged_in());
    assert!(hub.session().is_none());

    // Later operations fail locally instead of sending a dead session.
    let err = hub
        .stores
        .community
        .join_community(hub.stores.auth.session(), &"c1".into(), &"u1".into())
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotLoggedIn));

    assert!(hub.expire_rejected_login());
    assert!(hub.stores.auth.current_user().is_none());
    drop(hub);

    let reopened = hub_for(&server, Arc::new(FileStorage::open(&state)));
    assert!(!reopened.stores.auth.is_logged_in());
    assert!(reopened.session().is_none());
}

#[tokio::test]
async fn test_failed_login_save_leaves_nothing_behind() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(rpc_path("UserAuthentication", "login")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": { "_id": "u1", "username": "ada" },
            "session": "s1"
        })))
        .mount(&server)
        .await;

    let storage = Arc::new(TokenlessStorage::default());
    let mut hub = hub_for(&server, storage.clone());
    assert!(hub.login("ada", &SecretString::from("pw")).await.is_err());

    assert!(storage.get("user").is_none());
    assert!(storage.get("session").is_none());
    assert!(!hub_for(&server, storage).stores.auth.is_logged_in());
}

#[tokio::test]
async fn test_stored_login_without_token_is_discarded() {
    let server = MockServer::start().await;
    let storage = Arc::new(MemoryStorage::new());
    storage
        .set(
            "user",
            &json!({ "id": "u1", "username": "ada", "registration_date": null }).to_string(),
        )
        .unwrap();
    storage
        .set("session", &json!({ "id": "s1", "user": "u1", "expiry": null }).to_string())
        .unwrap();

    let hub = hub_for(&server, storage.clone());

    assert!(!hub.stores.auth.is_logged_in());
    assert!(storage.get("user").is_none());
    assert!(storage.get("session").is_none());
}

#[tokio::test]
async fn test_logout_clears_storage_and_resets_stores() {
    let (server, mut hub) = setup().await;

    Mock::given(method("POST"))
        .and(path(rpc_path("UserAuthentication", "login")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "user": "u1", "session": "s1" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(rpc_path("UserAuthentication", "_getUserById")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(rpc_path("UserAuthentication", "logout")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(rpc_path("UserEnrollments", "addEnrollment")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "enrollment": "e1" })))
        .mount(&server)
        .await;

    hub.login("ada", &SecretString::from("pw")).await.unwrap();
    assert_eq!(hub.stores.auth.username(), Some("ada"));

    hub.stores
        .enrollment
        .add_enrollment(
            hub.stores.auth.session(),
            &"u1".into(),
            &"c9".into(),
            &"s3".into(),
            true,
        )
        .await
        .unwrap();

    hub.logout().await;

    assert!(hub.session().is_none());
    assert_eq!(hub.stores.enrollment.enrollment_count(), 0);
    assert!(hub.rpc().http().storage().get(TOKEN_KEY).is_none());
}

// ── Study groups ────────────────────────────────────────────────────

#[tokio::test]
async fn test_join_study_group_refetches_groups() {
    let (server, mut hub) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/study-groups/7/join"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/study-groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 7,
            "name": "Compilers",
            "members": [{ "id": 1, "name": "Ada", "email": "ada@example.edu" }],
            "created_at": "2026-09-01T10:00:00Z"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let store = &mut hub.stores.study_groups;
    store.join_study_group(7).await.unwrap();

    assert_eq!(store.group_count(), 1);
    assert_eq!(store.groups()[0].members.len(), 1);
    assert!(store.groups()[0].created_at.is_some());
}

#[tokio::test]
async fn test_study_group_error_prefers_server_message() {
    let (server, mut hub) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/study-groups"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "message": "Name already taken" })),
        )
        .mount(&server)
        .await;

    let store = &mut hub.stores.study_groups;
    let result = store.create_study_group("Compilers", "", "CS").await;

    assert!(result.is_err());
    assert_eq!(store.status().error(), Some("Name already taken"));
    assert!(!store.status().is_loading());
}
