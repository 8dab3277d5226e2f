// REST API wire types
//
// Snake_case JSON, numeric ids.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyGroup {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub members: Vec<User>,
    #[serde(default)]
    pub created_at: String,
}

/// Fields accepted by `POST /study-groups`.
#[derive(Debug, Clone, Serialize)]
pub struct NewStudyGroup {
    pub name: String,
    pub description: String,
    pub subject: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudySession {
    pub id: i64,
    pub group_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub scheduled_time: String,
    /// Minutes.
    pub duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub is_online: bool,
}

/// Fields accepted by `POST /study-sessions`.
#[derive(Debug, Clone, Serialize)]
pub struct NewStudySession {
    pub group_id: i64,
    pub title: String,
    pub description: String,
    pub scheduled_time: String,
    pub duration: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub is_online: bool,
}

/// Partial update for `PUT /study-sessions/{id}`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StudySessionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_online: Option<bool>,
}

/// Partial update for `PUT /user/profile`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Response of `/auth/login` and `/auth/register`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}
