use crate::repositories::{decode_inserted, decode_rows};
use crate::tables::COMMENTS;
use crate::{Query, Result as GatewayErrorResult, SortOrder, TableApi};

use ld_core::Comment;
use serde_json::json;

pub struct CommentRepository<'a> {
    gateway: &'a dyn TableApi,
}

impl<'a> CommentRepository<'a> {
    pub fn new(gateway: &'a dyn TableApi) -> Self {
        Self { gateway }
    }

    /// Comments on a post, oldest first
    pub async fn find_by_post(&self, post_id: &str) -> GatewayErrorResult<Vec<Comment>> {
        let rows = self
            .gateway
            .select(
                &Query::table(COMMENTS)
                    .eq("post_id", post_id)
                    .order("created_at", SortOrder::Ascending),
            )
            .await?;
        decode_rows(rows)
    }

    pub async fn find_by_posts(&self, post_ids: &[String]) -> GatewayErrorResult<Vec<Comment>> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = self
            .gateway
            .select(&Query::table(COMMENTS).in_list("post_id", post_ids.iter().cloned()))
            .await?;
        decode_rows(rows)
    }

    pub async fn create(
        &self,
        post_id: &str,
        author_id: &str,
        content: &str,
    ) -> GatewayErrorResult<Comment> {
        let rows = self
            .gateway
            .insert(
                COMMENTS,
                json!({ "post_id": post_id, "author_id": author_id, "content": content }),
            )
            .await?;
        decode_inserted(rows, COMMENTS)
    }
}
