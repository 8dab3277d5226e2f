// ── Study groups (REST generation) ──
//
// Numeric ids, so these live outside the `Entity`/`EntityId` machinery.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyGroupMember {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyGroup {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub subject: String,
    pub members: Vec<StudyGroupMember>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySession {
    pub id: i64,
    pub group_id: i64,
    pub title: String,
    pub description: String,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub duration_minutes: u32,
    pub location: Option<String>,
    pub is_online: bool,
}
