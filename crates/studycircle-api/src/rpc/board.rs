// RPC API community board endpoints (postings and replies)

use serde_json::{Value, json};
use tracing::debug;

use crate::error::Error;
use crate::rpc::client::{RpcClient, with_session};
use crate::rpc::models::{PostingDraft, PostingEdit, PostingRecord, ReplyRecord};

const CONCEPT: &str = "CommunityBoard";

impl RpcClient {
    /// Create a posting and return its id.
    ///
    /// `POST /CommunityBoard/createPosting`
    pub async fn create_posting(&self, session: &str, draft: &PostingDraft) -> Result<String, Error> {
        debug!(community = %draft.community, title = %draft.title, "creating posting");
        let body = with_session(session, serde_json::to_value(draft));
        self.call_for_id(CONCEPT, "createPosting", "posting", body).await
    }

    /// `POST /CommunityBoard/editPosting`
    pub async fn edit_posting(
        &self,
        session: &str,
        posting: &str,
        editor: &str,
        edit: &PostingEdit,
    ) -> Result<(), Error> {
        debug!(posting, "editing posting");
        let mut body = with_session(session, serde_json::to_value(edit));
        if let Value::Object(map) = &mut body {
            map.insert("posting".into(), posting.into());
            map.insert("editor".into(), editor.into());
        }
        self.call_unit(CONCEPT, "editPosting", body).await
    }

    /// `POST /CommunityBoard/deletePosting`
    pub async fn delete_posting(&self, session: &str, posting: &str, deleter: &str) -> Result<(), Error> {
        debug!(posting, "deleting posting");
        self.call_unit(
            CONCEPT,
            "deletePosting",
            json!({ "session": session, "posting": posting, "deleter": deleter }),
        )
        .await
    }

    /// Reply to a posting and return the reply id.
    ///
    /// `POST /CommunityBoard/replyToPosting`
    pub async fn reply_to_posting(
        &self,
        session: &str,
        posting: &str,
        author: &str,
        body: &str,
    ) -> Result<String, Error> {
        debug!(posting, author, "replying to posting");
        self.call_for_id(
            CONCEPT,
            "replyToPosting",
            "reply",
            json!({ "session": session, "posting": posting, "author": author, "body": body }),
        )
        .await
    }

    /// `POST /CommunityBoard/editReply`
    pub async fn edit_reply(
        &self,
        session: &str,
        reply: &str,
        editor: &str,
        new_body: &str,
    ) -> Result<(), Error> {
        debug!(reply, "editing reply");
        self.call_unit(
            CONCEPT,
            "editReply",
            json!({ "session": session, "reply": reply, "editor": editor, "newBody": new_body }),
        )
        .await
    }

    /// `POST /CommunityBoard/deleteReply`
    pub async fn delete_reply(&self, session: &str, reply: &str, deleter: &str) -> Result<(), Error> {
        debug!(reply, "deleting reply");
        self.call_unit(
            CONCEPT,
            "deleteReply",
            json!({ "session": session, "reply": reply, "deleter": deleter }),
        )
        .await
    }

    /// `POST /CommunityBoard/_getPostingById`
    pub async fn get_posting(&self, posting: &str) -> Result<Option<PostingRecord>, Error> {
        debug!(posting, "fetching posting");
        self.query_one(CONCEPT, "_getPostingById", "posting", json!({ "posting": posting }))
            .await
    }

    /// `POST /CommunityBoard/_getPostsForCommunity`
    pub async fn list_postings(&self, community: &str) -> Result<Vec<PostingRecord>, Error> {
        debug!(community, "listing postings");
        self.query_list(
            CONCEPT,
            "_getPostsForCommunity",
            "posting",
            json!({ "community": community }),
        )
        .await
    }

    /// `POST /CommunityBoard/_getRepliesForPosting`
    pub async fn list_replies(&self, posting: &str) -> Result<Vec<ReplyRecord>, Error> {
        debug!(posting, "listing replies");
        self.query_list(
            CONCEPT,
            "_getRepliesForPosting",
            "reply",
            json!({ "posting": posting }),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn edit_body_omits_untouched_fields() {
        let edit = PostingEdit {
            new_title: Some("Renamed".into()),
            ..PostingEdit::default()
        };
        let body = with_session("s1", serde_json::to_value(&edit));
        assert_eq!(body, json!({ "session": "s1", "newTitle": "Renamed" }));
    }

    #[test]
    fn draft_body_carries_null_free_course() {
        let draft = PostingDraft {
            author: "u1".into(),
            community: "c1".into(),
            title: "Hi".into(),
            body: "There".into(),
            tags: vec!["intro".into()],
            course: None,
        };
        let body = with_session("s1", serde_json::to_value(&draft));
        assert_eq!(
            body,
            json!({
                "session": "s1",
                "author": "u1",
                "community": "c1",
                "title": "Hi",
                "body": "There",
                "tags": ["intro"],
            })
        );
    }
}
