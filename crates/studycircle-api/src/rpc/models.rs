// RPC API wire types
//
// Records as the backend sends them: MongoDB-style `_id` keys and
// camelCase fields. Fields use `#[serde(default)]` liberally because the
// backend omits empty values inconsistently. Timestamps stay strings here;
// `studycircle-core` parses them.

use serde::{Deserialize, Serialize};

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub registration_date: Option<String>,
}

/// Result of a successful `UserAuthentication/login`.
#[derive(Debug, Clone)]
pub struct LoginGrant {
    pub user_id: String,
    /// Present when the backend returned the full user object.
    pub user: Option<UserRecord>,
    pub session_id: String,
    pub expiry_time: Option<String>,
}

// ── Profiles ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default, rename = "thumbnailImageURL")]
    pub thumbnail_image_url: String,
}

// ── Communities ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub creation_date: Option<String>,
    #[serde(default)]
    pub memberships: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: String,
    pub community: String,
    /// `"ADMIN"` or `"MEMBER"`.
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub join_date: Option<String>,
}

// ── Community board ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostingRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub author: String,
    pub community: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub replies: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub author: String,
    pub posting: String,
    #[serde(default)]
    pub body: String,
}

/// Body fields for `CommunityBoard/createPosting`.
#[derive(Debug, Clone, Serialize)]
pub struct PostingDraft {
    pub author: String,
    pub community: String,
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
}

/// Body fields for `CommunityBoard/editPosting`. `None` leaves a field as is.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostingEdit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_course: Option<String>,
}

// ── Course catalog ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub term: String,
    #[serde(default)]
    pub course_number: String,
    #[serde(default)]
    pub course_name: String,
    #[serde(default)]
    pub department: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub course: String,
    #[serde(default)]
    pub class_type: String,
    #[serde(default)]
    pub days: Vec<String>,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub instructor: String,
}

/// Descriptive course fields shared by `defineCourse` and `updateCourseDetails`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseFields {
    pub course_number: String,
    pub course_name: String,
    pub department: String,
}

/// Descriptive section fields shared by `addSection` and `editSection`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionFields {
    pub class_type: String,
    pub days: Vec<String>,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub instructor: String,
}

// ── Enrollments ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub owner: String,
    pub course: String,
    pub section: String,
    #[serde(default)]
    pub visibility: bool,
}
