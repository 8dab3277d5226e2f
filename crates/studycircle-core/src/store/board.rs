// ── Community board store ──
//
// Postings (newest first) and their replies. A post's `replies` id list
// is kept consistent with the reply collection: an id appears at most
// once and disappears with its reply.

use tracing::{debug, warn};

use studycircle_api::RpcClient;
use studycircle_api::rpc::models::{PostingDraft, PostingEdit};

use crate::error::CoreError;
use crate::model::{
    Entity, EntityId, NewPost, Post, PostPatch, Reply, ReplyPatch, Session, dedupe_tags,
};
use crate::store::collection::EntityCollection;
use crate::store::status::StoreStatus;

pub struct BoardStore {
    api: RpcClient,
    posts: EntityCollection<Post>,
    replies: EntityCollection<Reply>,
    current: Option<Post>,
    pub(crate) status: StoreStatus,
}

impl BoardStore {
    pub fn new(api: RpcClient) -> Self {
        Self {
            api,
            posts: EntityCollection::new(),
            replies: EntityCollection::new(),
            current: None,
            status: StoreStatus::default(),
        }
    }

    // ── Views ────────────────────────────────────────────────────────

    pub fn status(&self) -> &StoreStatus {
        &self.status
    }

    pub fn posts(&self) -> &EntityCollection<Post> {
        &self.posts
    }

    pub fn replies(&self) -> &EntityCollection<Reply> {
        &self.replies
    }

    pub fn current_post(&self) -> Option<&Post> {
        self.current.as_ref()
    }

    pub fn posts_by_community(&self, community: &EntityId) -> Vec<Post> {
        self.posts.filtered(|p| p.community == *community)
    }

    pub fn posts_by_course(&self, course: &EntityId) -> Vec<Post> {
        self.posts.filtered(|p| p.course.as_ref() == Some(course))
    }

    pub fn posts_by_tag(&self, tag: &str) -> Vec<Post> {
        self.posts.filtered(|p| p.has_tag(tag))
    }

    pub fn replies_for_post(&self, post: &EntityId) -> Vec<Reply> {
        self.replies.filtered(|r| r.posting == *post)
    }

    pub fn user_posts(&self, user: &EntityId) -> Vec<Post> {
        self.posts.filtered(|p| p.author == *user)
    }

    pub fn user_replies(&self, user: &EntityId) -> Vec<Reply> {
        self.replies.filtered(|r| r.author == *user)
    }

    // ── Mutators ─────────────────────────────────────────────────────

    pub fn set_posts(&mut self, posts: Vec<Post>) {
        self.posts.set_all(posts);
    }

    pub fn set_replies(&mut self, replies: Vec<Reply>) {
        self.replies.set_all(replies);
    }

    /// Insert at the front (newest first).
    pub fn add_post(&mut self, mut post: Post) {
        post.tags = dedupe_tags(std::mem::take(&mut post.tags));
        self.posts.prepend(post);
    }

    pub fn update_post(&mut self, id: &EntityId, patch: &PostPatch) {
        self.posts.update(id, patch);
        if let Some(current) = self.current.as_mut().filter(|p| p.id == *id) {
            current.apply(patch);
        }
    }

    /// Remove a post and exactly its replies.
    pub fn remove_post(&mut self, id: &EntityId) {
        self.posts.remove(id);
        self.replies.retain(|r| r.posting != *id);
        if self.current.as_ref().is_some_and(|p| p.id == *id) {
            self.current = None;
        }
    }

    /// Append a reply and link it into its post's reply list.
    pub fn add_reply(&mut self, reply: Reply) {
        let posting = reply.posting.clone();
        let id = reply.id.clone();
        self.replies.push(reply);
        let link = |p: &mut Post| {
            if !p.replies.contains(&id) {
                p.replies.push(id.clone());
            }
        };
        self.posts.update_with(&posting, link);
        if let Some(current) = self.current.as_mut().filter(|p| p.id == posting) {
            link(current);
        }
    }

    pub fn update_reply(&mut self, id: &EntityId, patch: &ReplyPatch) {
        self.replies.update(id, patch);
    }

    /// Remove a reply and unlink it from its post.
    pub fn remove_reply(&mut self, id: &EntityId) {
        let Some(reply) = self.replies.remove(id) else {
            return;
        };
        let unlink = |p: &mut Post| p.replies.retain(|r| r != id);
        self.posts.update_with(&reply.posting, unlink);
        if let Some(current) = self.current.as_mut().filter(|p| p.id == reply.posting) {
            unlink(current);
        }
    }

    pub fn set_current_post(&mut self, post: Option<Post>) {
        self.current = post;
    }

    // ── API operations ───────────────────────────────────────────────

    /// Fetch a community's posts and merge them into the cache.
    pub async fn fetch_posts_for_community(&mut self, community: &EntityId) {
        self.status.begin();
        match self.api.list_postings(community.as_str()).await {
            Ok(records) => {
                debug!(%community, count = records.len(), "posts fetched");
                self.posts.merge(records.into_iter().map(Post::from).collect());
            }
            Err(e) => self.status.record(&e.into(), "Failed to fetch posts"),
        }
        self.status.finish();
    }

    /// Fetch a post's replies, merge them, and sync the post's reply list.
    pub async fn fetch_replies_for_post(&mut self, post: &EntityId) {
        self.status.begin();
        match self.api.list_replies(post.as_str()).await {
            Ok(records) => {
                let replies: Vec<Reply> = records.into_iter().map(Reply::from).collect();
                debug!(%post, count = replies.len(), "replies fetched");
                let ids: Vec<EntityId> = replies.iter().map(|r| r.id.clone()).collect();
                self.replies.merge(replies);
                let sync = |p: &mut Post| {
                    for id in &ids {
                        if !p.replies.contains(id) {
                            p.replies.push(id.clone());
                        }
                    }
                };
                self.posts.update_with(post, sync);
                if let Some(current) = self.current.as_mut().filter(|p| p.id == *post) {
                    sync(current);
                }
            }
            Err(e) => self.status.record(&e.into(), "Failed to fetch replies"),
        }
        self.status.finish();
    }

    /// Create a post; it is placed first. Built from the inputs when the
    /// detail fetch fails.
    pub async fn create_post(
        &mut self,
        session: Option<&Session>,
        new: NewPost,
    ) -> Result<Post, CoreError> {
        let session = self.status.require_session(session)?;
        self.status.begin();
        let result = self.create_post_inner(session, new).await;
        self.status.settle(&result, "Failed to create post");
        result
    }

    async fn create_post_inner(&mut self, session: &Session, new: NewPost) -> Result<Post, CoreError> {
        let tags = dedupe_tags(new.tags);
        let draft = PostingDraft {
            author: new.author.to_string(),
            community: new.community.to_string(),
            title: new.title.clone(),
            body: new.body.clone(),
            tags: tags.clone(),
            course: new.course.as_ref().map(ToString::to_string),
        };
        let id = self.api.create_posting(session.id.as_str(), &draft).await?;

        let post = match self.api.get_posting(&id).await {
            Ok(Some(record)) if record.id == id => Post::from(record),
            Ok(_) => synthesized_post(id, new.author, new.community, new.title, new.body, tags, new.course),
            Err(e) => {
                warn!(error = %e, "could not fetch new post, using inputs");
                synthesized_post(id, new.author, new.community, new.title, new.body, tags, new.course)
            }
        };
        self.add_post(post.clone());
        Ok(post)
    }

    pub async fn edit_post(
        &mut self,
        session: Option<&Session>,
        post: &EntityId,
        editor: &EntityId,
        patch: PostPatch,
    ) -> Result<(), CoreError> {
        let session = self.status.require_session(session)?;
        self.status.begin();
        let patch = PostPatch {
            tags: patch.tags.map(dedupe_tags),
            ..patch
        };
        let edit = PostingEdit {
            new_title: patch.title.clone(),
            new_body: patch.body.clone(),
            new_tags: patch.tags.clone(),
            new_course: patch.course.as_ref().map(ToString::to_string),
        };
        let result = self
            .api
            .edit_posting(session.id.as_str(), post.as_str(), editor.as_str(), &edit)
            .await
            .map_err(CoreError::from);
        if result.is_ok() {
            self.update_post(post, &patch);
        }
        self.status.settle(&result, "Failed to edit post");
        result
    }

    pub async fn delete_post(
        &mut self,
        session: Option<&Session>,
        post: &EntityId,
        deleter: &EntityId,
    ) -> Result<(), CoreError> {
        let session = self.status.require_session(session)?;
        self.status.begin();
        let result = self
            .api
            .delete_posting(session.id.as_str(), post.as_str(), deleter.as_str())
            .await
            .map_err(CoreError::from);
        if result.is_ok() {
            self.remove_post(post);
        }
        self.status.settle(&result, "Failed to delete post");
        result
    }

    pub async fn reply_to_post(
        &mut self,
        session: Option<&Session>,
        post: &EntityId,
        author: &EntityId,
        body: &str,
    ) -> Result<Reply, CoreError> {
        let session = self.status.require_session(session)?;
        self.status.begin();
        let outcome = self
            .api
            .reply_to_posting(session.id.as_str(), post.as_str(), author.as_str(), body)
            .await;
        let result = match outcome {
            Ok(id) => {
                let reply = Reply {
                    id: id.into(),
                    author: author.clone(),
                    posting: post.clone(),
                    body: body.to_owned(),
                };
                self.add_reply(reply.clone());
                Ok(reply)
            }
            Err(e) => Err(CoreError::from(e)),
        };
        self.status.settle(&result, "Failed to reply to post");
        result
    }

    pub async fn edit_reply(
        &mut self,
        session: Option<&Session>,
        reply: &EntityId,
        editor: &EntityId,
        body: &str,
    ) -> Result<(), CoreError> {
        let session = self.status.require_session(session)?;
        self.status.begin();
        let result = self
            .api
            .edit_reply(session.id.as_str(), reply.as_str(), editor.as_str(), body)
            .await
            .map_err(CoreError::from);
        if result.is_ok() {
            self.update_reply(
                reply,
                &ReplyPatch {
                    body: Some(body.to_owned()),
                },
            );
        }
        self.status.settle(&result, "Failed to edit reply");
        result
    }

    pub async fn delete_reply(
        &mut self,
        session: Option<&Session>,
        reply: &EntityId,
        deleter: &EntityId,
    ) -> Result<(), CoreError> {
        let session = self.status.require_session(session)?;
        self.status.begin();
        let result = self
            .api
            .delete_reply(session.id.as_str(), reply.as_str(), deleter.as_str())
            .await
            .map_err(CoreError::from);
        if result.is_ok() {
            self.remove_reply(reply);
        }
        self.status.settle(&result, "Failed to delete reply");
        result
    }

    pub(crate) fn reset(&mut self) {
        self.posts.clear();
        self.replies.clear();
        self.current = None;
        self.status.reset();
    }
}

fn synthesized_post(
    id: String,
    author: EntityId,
    community: EntityId,
    title: String,
    body: String,
    tags: Vec<String>,
    course: Option<EntityId>,
) -> Post {
    Post {
        id: id.into(),
        author,
        community,
        title,
        body,
        tags,
        course,
        replies: Vec::new(),
    }
}
