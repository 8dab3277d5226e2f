// ── Community board: postings and replies ──

use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;
use super::{Entity, patch_field};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: EntityId,
    pub author: EntityId,
    pub community: EntityId,
    pub title: String,
    pub body: String,
    /// Set-like: no duplicates, first-seen order.
    pub tags: Vec<String>,
    pub course: Option<EntityId>,
    /// Reply ids, denormalized. Each id appears at most once.
    pub replies: Vec<EntityId>,
}

impl Post {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub tags: Option<Vec<String>>,
    pub course: Option<EntityId>,
    pub replies: Option<Vec<EntityId>>,
}

impl Entity for Post {
    type Patch = PostPatch;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn apply(&mut self, patch: &PostPatch) {
        patch_field(&mut self.title, patch.title.as_ref());
        patch_field(&mut self.body, patch.body.as_ref());
        if let Some(tags) = &patch.tags {
            self.tags = dedupe_tags(tags.iter().cloned());
        }
        if let Some(course) = &patch.course {
            self.course = Some(course.clone());
        }
        patch_field(&mut self.replies, patch.replies.as_ref());
    }
}

/// Inputs for a new posting.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author: EntityId,
    pub community: EntityId,
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    pub course: Option<EntityId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub id: EntityId,
    pub author: EntityId,
    pub posting: EntityId,
    pub body: String,
}

#[derive(Debug, Clone, Default)]
pub struct ReplyPatch {
    pub body: Option<String>,
}

impl Entity for Reply {
    type Patch = ReplyPatch;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn apply(&mut self, patch: &ReplyPatch) {
        patch_field(&mut self.body, patch.body.as_ref());
    }
}

/// Trim, drop empties, and remove duplicate tags keeping first occurrence.
pub fn dedupe_tags(tags: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_owned());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_deduplicated_in_order() {
        let tags = dedupe_tags(["graphs", " dp", "graphs", "", "dp"].map(String::from));
        assert_eq!(tags, vec!["graphs".to_string(), "dp".to_string()]);
    }

    #[test]
    fn patch_dedupes_tags() {
        let mut post = Post {
            id: "p1".into(),
            author: "u1".into(),
            community: "c1".into(),
            title: "t".into(),
            body: "b".into(),
            tags: vec![],
            course: None,
            replies: vec![],
        };
        post.apply(&PostPatch {
            tags: Some(vec!["a".into(), "a".into()]),
            ..PostPatch::default()
        });
        assert_eq!(post.tags, vec!["a".to_string()]);
        assert_eq!(post.title, "t");
    }
}
