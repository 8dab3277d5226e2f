#![allow(clippy::unwrap_used)]
// Integration tests for `RestClient` using wiremock.

use std::sync::Arc;

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use studycircle_api::rest::models::{NewStudyGroup, StudySessionUpdate};
use studycircle_api::{Error, HttpClient, MemoryStorage, RestClient, Storage, TOKEN_KEY};

async fn setup() -> (MockServer, RestClient, Arc<MemoryStorage>) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/api", server.uri())).unwrap();
    let storage = Arc::new(MemoryStorage::new());
    let http = HttpClient::with_client(reqwest::Client::new(), base_url, storage.clone(), 30);
    (server, RestClient::new(http), storage)
}

fn group_json(id: i64, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "description": "weekly",
        "subject": "math",
        "members": [],
        "created_at": "2024-09-01T10:00:00Z"
    })
}

#[tokio::test]
async fn test_login_stores_token() {
    let (server, client, storage) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "ada@uni.edu", "password": "pw" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok-1",
            "user": { "id": 7, "name": "Ada", "email": "ada@uni.edu" }
        })))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "pw".to_string().into();
    let resp = client.login("ada@uni.edu", &secret).await.unwrap();
    assert_eq!(resp.user.unwrap().id, 7);
    assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("tok-1"));
}

#[tokio::test]
async fn test_logout_clears_token_even_on_failure() {
    let (server, client, storage) = setup().await;
    storage.set(TOKEN_KEY, "tok-1").unwrap();

    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(client.logout().await.is_err());
    assert!(storage.get(TOKEN_KEY).is_none());
}

#[tokio::test]
async fn test_list_and_create_study_groups() {
    let (server, client, storage) = setup().await;
    storage.set(TOKEN_KEY, "tok-1").unwrap();

    Mock::given(method("GET"))
        .and(path("/api/study-groups"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([group_json(1, "Calc")])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/study-groups"))
        .and(body_json(json!({ "name": "Linear", "description": "weekly", "subject": "math" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(group_json(2, "Linear")))
        .mount(&server)
        .await;

    let groups = client.list_study_groups().await.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].name, "Calc");

    let created = client
        .create_study_group(&NewStudyGroup {
            name: "Linear".into(),
            description: "weekly".into(),
            subject: "math".into(),
        })
        .await
        .unwrap();
    assert_eq!(created.id, 2);
}

#[tokio::test]
async fn test_join_study_group_error_message() {
    let (server, client, _) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/study-groups/5/join"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({ "message": "Group is full" })))
        .mount(&server)
        .await;

    let err = client.join_study_group(5).await.unwrap_err();
    assert!(matches!(err, Error::Api { status: 409, .. }));
    assert_eq!(err.server_message(), Some("Group is full"));
}

#[tokio::test]
async fn test_list_study_sessions_filters_by_group() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/study-sessions"))
        .and(query_param("group_id", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 10,
            "group_id": 3,
            "title": "Midterm prep",
            "description": "",
            "scheduled_time": "2024-10-01T18:00:00Z",
            "duration": 90,
            "is_online": true
        }])))
        .mount(&server)
        .await;

    let sessions = client.list_study_sessions(Some(3)).await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].duration, 90);
    assert!(sessions[0].location.is_none());
}

#[tokio::test]
async fn test_update_study_session_sends_only_changed_fields() {
    let (server, client, _) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/study-sessions/10"))
        .and(body_json(json!({ "duration": 120 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 10,
            "group_id": 3,
            "title": "Midterm prep",
            "scheduled_time": "2024-10-01T18:00:00Z",
            "duration": 120
        })))
        .mount(&server)
        .await;

    let update = StudySessionUpdate {
        duration: Some(120),
        ..StudySessionUpdate::default()
    };
    let session = client.update_study_session(10, &update).await.unwrap();
    assert_eq!(session.duration, 120);
    assert!(!session.is_online);
}

#[tokio::test]
async fn test_unauthorized_profile_fetch_signals_login() {
    let (server, client, storage) = setup().await;
    storage.set(TOKEN_KEY, "tok-1").unwrap();
    let login_required = client.http().login_required();

    Mock::given(method("GET"))
        .and(path("/api/user/profile"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client.get_user_profile().await.unwrap_err();
    assert!(err.is_auth_expired());
    assert!(storage.get(TOKEN_KEY).is_none());
    assert!(*login_required.borrow());
}
