//! Community board command handlers.

use tabled::Tabled;

use studycircle_core::{EntityId, Hub, NewPost, Post, PostPatch, Reply};

use crate::cli::{BoardArgs, BoardCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct PostRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Tags")]
    tags: String,
    #[tabled(rename = "Replies")]
    replies: usize,
}

/// Author ids resolved to display names before rendering.
struct Named<'a, T> {
    item: &'a T,
    author: String,
}

impl From<&Named<'_, Post>> for PostRow {
    fn from(n: &Named<'_, Post>) -> Self {
        let p = n.item;
        Self {
            id: p.id.to_string(),
            title: util::truncate(&p.title, 48),
            author: n.author.clone(),
            tags: p.tags.join(", "),
            replies: p.replies.len(),
        }
    }
}

#[derive(Tabled)]
struct ReplyRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Reply")]
    body: String,
}

impl From<&Named<'_, Reply>> for ReplyRow {
    fn from(n: &Named<'_, Reply>) -> Self {
        Self {
            id: n.item.id.to_string(),
            author: n.author.clone(),
            body: util::truncate(&n.item.body, 72),
        }
    }
}

impl<T: serde::Serialize> serde::Serialize for Named<'_, T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.item.serialize(serializer)
    }
}

/// Fetch the authors' profiles and pair each item with a display name.
async fn with_authors<'a, T>(
    hub: &mut Hub,
    items: &'a [T],
    author_of: impl Fn(&T) -> &EntityId,
) -> Vec<Named<'a, T>> {
    let authors: Vec<EntityId> = items.iter().map(&author_of).cloned().collect();
    let mut lookup = hub.profile_lookup();
    lookup.fetch_profiles_for_users(&authors).await;
    items
        .iter()
        .map(|item| Named {
            item,
            author: lookup.display_name(Some(author_of(item))),
        })
        .collect()
}

fn some_if_nonempty(value: Option<String>) -> Option<EntityId> {
    value.filter(|v| !v.is_empty()).map(EntityId::from)
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(hub: &mut Hub, args: BoardArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        BoardCommand::Posts {
            community,
            tag,
            course,
        } => {
            let community = EntityId::from(community);
            let store = &mut hub.stores.board;
            store.fetch_posts_for_community(&community).await;
            util::check_fetch(store.status())?;

            let mut posts = store.posts_by_community(&community);
            if let Some(tag) = &tag {
                posts.retain(|p| p.has_tag(tag));
            }
            if let Some(course) = some_if_nonempty(course) {
                posts.retain(|p| p.course.as_ref() == Some(&course));
            }

            let named = with_authors(hub, &posts, |p| &p.author).await;
            let out = output::render_list(
                &global.output,
                &named,
                |r| PostRow::from(r),
                |n| n.item.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BoardCommand::Post {
            community,
            title,
            body,
            tags,
            course,
        } => {
            let me = util::require_user(hub)?;
            let new = NewPost {
                author: me,
                community: community.into(),
                title,
                body,
                tags,
                course: some_if_nonempty(course),
            };
            let post = hub
                .stores
                .board
                .create_post(hub.stores.auth.session(), new)
                .await?;
            output::print_output(post.id.as_str(), global.quiet);
            output::success("Posting published", &global.color, global.quiet);
            Ok(())
        }

        BoardCommand::Edit {
            posting,
            title,
            body,
            tags,
            course,
        } => {
            let me = util::require_user(hub)?;
            let patch = PostPatch {
                title,
                body,
                tags,
                course: some_if_nonempty(course),
                replies: None,
            };
            hub.stores
                .board
                .edit_post(hub.stores.auth.session(), &posting.into(), &me, patch)
                .await?;
            output::success("Posting updated", &global.color, global.quiet);
            Ok(())
        }

        BoardCommand::Delete { posting } => {
            let me = util::require_user(hub)?;
            if !util::confirm(
                &format!("Delete posting {posting} and its replies?"),
                "board delete",
                global.yes,
            )? {
                return Ok(());
            }
            hub.stores
                .board
                .delete_post(hub.stores.auth.session(), &posting.into(), &me)
                .await?;
            output::success("Posting deleted", &global.color, global.quiet);
            Ok(())
        }

        BoardCommand::Replies { posting } => {
            let posting = EntityId::from(posting);
            let store = &mut hub.stores.board;
            store.fetch_replies_for_post(&posting).await;
            util::check_fetch(store.status())?;
            let replies = store.replies_for_post(&posting);

            let named = with_authors(hub, &replies, |r| &r.author).await;
            let out = output::render_list(
                &global.output,
                &named,
                |r| ReplyRow::from(r),
                |n| n.item.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BoardCommand::Reply { posting, body } => {
            let me = util::require_user(hub)?;
            let reply = hub
                .stores
                .board
                .reply_to_post(hub.stores.auth.session(), &posting.into(), &me, &body)
                .await?;
            output::print_output(reply.id.as_str(), global.quiet);
            output::success("Reply posted", &global.color, global.quiet);
            Ok(())
        }

        BoardCommand::EditReply { reply, body } => {
            let me = util::require_user(hub)?;
            hub.stores
                .board
                .edit_reply(hub.stores.auth.session(), &reply.into(), &me, &body)
                .await?;
            output::success("Reply updated", &global.color, global.quiet);
            Ok(())
        }

        BoardCommand::DeleteReply { reply } => {
            let me = util::require_user(hub)?;
            if !util::confirm(
                &format!("Delete reply {reply}?"),
                "board delete-reply",
                global.yes,
            )? {
                return Ok(());
            }
            hub.stores
                .board
                .delete_reply(hub.stores.auth.session(), &reply.into(), &me)
                .await?;
            output::success("Reply deleted", &global.color, global.quiet);
            Ok(())
        }
    }
}
