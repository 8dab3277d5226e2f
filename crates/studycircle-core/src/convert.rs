// ── API-to-domain type conversions ──
//
// Bridges `studycircle_api` wire records into canonical
// `studycircle_core::model` types. Each `From` impl parses timestamps,
// normalizes enum spellings, and fills defaults for missing data.

use std::str::FromStr;

use chrono::{DateTime, Utc};

use studycircle_api::rest::models as rest;
use studycircle_api::rpc::models::{
    CommunityRecord, CourseRecord, EnrollmentRecord, MembershipRecord, PostingRecord,
    ProfileRecord, ReplyRecord, SectionRecord, TermRecord, UserRecord,
};

use crate::model::{
    Community, Course, Enrollment, EntityId, Membership, Post, Reply, Role, Section, StudyGroup,
    StudyGroupMember, StudySession, Term, User, UserProfile, dedupe_tags,
};

// ── Helpers ────────────────────────────────────────────────────────

/// Parse an ISO-8601 timestamp, silently dropping unparseable values.
pub(crate) fn parse_datetime(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Unknown role spellings fall back to `MEMBER`.
fn parse_role(raw: &str) -> Role {
    Role::from_str(raw.trim()).unwrap_or_default()
}

fn non_empty_id(raw: Option<String>) -> Option<EntityId> {
    raw.filter(|s| !s.is_empty()).map(EntityId::from)
}

// ── RPC generation ─────────────────────────────────────────────────

impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        Self {
            id: r.id.into(),
            username: r.username,
            registration_date: parse_datetime(r.registration_date.as_deref()),
        }
    }
}

impl From<ProfileRecord> for UserProfile {
    fn from(r: ProfileRecord) -> Self {
        Self {
            id: r.id.into(),
            user: r.user.into(),
            display_name: r.display_name,
            bio: r.bio,
            thumbnail_image_url: r.thumbnail_image_url,
        }
    }
}

impl From<CommunityRecord> for Community {
    fn from(r: CommunityRecord) -> Self {
        Self {
            id: r.id.into(),
            name: r.name,
            description: r.description,
            creation_date: parse_datetime(r.creation_date.as_deref()),
            memberships: r
                .memberships
                .unwrap_or_default()
                .into_iter()
                .map(EntityId::from)
                .collect(),
        }
    }
}

impl From<MembershipRecord> for Membership {
    fn from(r: MembershipRecord) -> Self {
        Self {
            id: r.id.into(),
            user: r.user.into(),
            community: r.community.into(),
            role: parse_role(&r.role),
            join_date: parse_datetime(r.join_date.as_deref()),
        }
    }
}

impl From<PostingRecord> for Post {
    fn from(r: PostingRecord) -> Self {
        let mut replies: Vec<EntityId> = Vec::with_capacity(r.replies.len());
        for id in r.replies {
            if !replies.iter().any(|existing| *existing == *id) {
                replies.push(id.into());
            }
        }
        Self {
            id: r.id.into(),
            author: r.author.into(),
            community: r.community.into(),
            title: r.title,
            body: r.body,
            tags: dedupe_tags(r.tags),
            course: non_empty_id(r.course),
            replies,
        }
    }
}

impl From<ReplyRecord> for Reply {
    fn from(r: ReplyRecord) -> Self {
        Self {
            id: r.id.into(),
            author: r.author.into(),
            posting: r.posting.into(),
            body: r.body,
        }
    }
}

impl From<TermRecord> for Term {
    fn from(r: TermRecord) -> Self {
        Self {
            id: r.id.into(),
            name: r.name,
        }
    }
}

impl From<CourseRecord> for Course {
    fn from(r: CourseRecord) -> Self {
        Self {
            id: r.id.into(),
            term: r.term.into(),
            course_number: r.course_number,
            course_name: r.course_name,
            department: r.department,
        }
    }
}

impl From<SectionRecord> for Section {
    fn from(r: SectionRecord) -> Self {
        Self {
            id: r.id.into(),
            course: r.course.into(),
            class_type: r.class_type,
            days: r.days,
            start_time: r.start_time,
            end_time: r.end_time,
            location: r.location,
            instructor: r.instructor,
        }
    }
}

impl From<EnrollmentRecord> for Enrollment {
    fn from(r: EnrollmentRecord) -> Self {
        Self {
            id: r.id.into(),
            owner: r.owner.into(),
            course: r.course.into(),
            section: r.section.into(),
            visibility: r.visibility,
        }
    }
}

// ── REST generation ────────────────────────────────────────────────

impl From<rest::User> for StudyGroupMember {
    fn from(u: rest::User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            avatar: u.avatar.filter(|a| !a.is_empty()),
        }
    }
}

impl From<rest::StudyGroup> for StudyGroup {
    fn from(g: rest::StudyGroup) -> Self {
        Self {
            id: g.id,
            name: g.name,
            description: g.description,
            subject: g.subject,
            members: g.members.into_iter().map(StudyGroupMember::from).collect(),
            created_at: parse_datetime(Some(&g.created_at)),
        }
    }
}

impl From<rest::StudySession> for StudySession {
    fn from(s: rest::StudySession) -> Self {
        Self {
            id: s.id,
            group_id: s.group_id,
            title: s.title,
            description: s.description,
            scheduled_time: parse_datetime(Some(&s.scheduled_time)),
            duration_minutes: s.duration,
            location: s.location.filter(|l| !l.is_empty()),
            is_online: s.is_online,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn membership_role_parsing_tolerates_case_and_unknowns() {
        let record = |role: &str| MembershipRecord {
            id: "m1".into(),
            user: "u1".into(),
            community: "c1".into(),
            role: role.into(),
            join_date: Some("2024-09-01T12:00:00.000Z".into()),
        };
        assert_eq!(Membership::from(record("ADMIN")).role, Role::Admin);
        assert_eq!(Membership::from(record("admin")).role, Role::Admin);
        assert_eq!(Membership::from(record("")).role, Role::Member);
        assert!(Membership::from(record("MEMBER")).join_date.is_some());
    }

    #[test]
    fn posting_dedupes_tags_and_replies() {
        let post = Post::from(PostingRecord {
            id: "p1".into(),
            author: "u1".into(),
            community: "c1".into(),
            title: "t".into(),
            body: "b".into(),
            tags: vec!["x".into(), "x".into(), "y".into()],
            course: Some(String::new()),
            replies: vec!["r1".into(), "r1".into()],
        });
        assert_eq!(post.tags, vec!["x".to_string(), "y".to_string()]);
        assert_eq!(post.replies.len(), 1);
        assert!(post.course.is_none());
    }

    #[test]
    fn bad_timestamps_become_none() {
        assert!(parse_datetime(Some("yesterday")).is_none());
        assert!(parse_datetime(None).is_none());
        assert!(parse_datetime(Some("2024-01-01T00:00:00Z")).is_some());
    }
}
