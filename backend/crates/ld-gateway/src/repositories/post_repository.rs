use crate::repositories::{decode_inserted, decode_rows};
use crate::tables::{POST_LIKES, POSTS};
use crate::{Query, Result as GatewayErrorResult, SortOrder, TableApi};

use ld_core::{Post, PostLike};
use serde::Serialize;
use serde_json::json;

pub struct PostRepository<'a> {
    gateway: &'a dyn TableApi,
}

impl<'a> PostRepository<'a> {
    pub fn new(gateway: &'a dyn TableApi) -> Self {
        Self { gateway }
    }

    /// Every post, newest first
    pub async fn list_recent(&self) -> GatewayErrorResult<Vec<Post>> {
        let rows = self
            .gateway
            .select(&Query::table(POSTS).order("created_at", SortOrder::Descending))
            .await?;
        decode_rows(rows)
    }

    pub async fn create(
        &self,
        author_id: &str,
        content: &str,
        image_url: Option<&str>,
    ) -> GatewayErrorResult<Post> {
        #[derive(Serialize)]
        struct NewPost<'b> {
            author_id: &'b str,
            content: &'b str,
            #[serde(skip_serializing_if = "Option::is_none")]
            image_url: Option<&'b str>,
        }

        let row = NewPost {
            author_id,
            content,
            image_url,
        };
        let rows = self
            .gateway
            .insert(POSTS, serde_json::to_value(&row)?)
            .await?;
        decode_inserted(rows, POSTS)
    }

    pub async fn likes_for(&self, post_ids: &[String]) -> GatewayErrorResult<Vec<PostLike>> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = self
            .gateway
            .select(&Query::table(POST_LIKES).in_list("post_id", post_ids.iter().cloned()))
            .await?;
        decode_rows(rows)
    }

    pub async fn like(&self, post_id: &str, user_id: &str) -> GatewayErrorResult<PostLike> {
        let rows = self
            .gateway
            .insert(POST_LIKES, json!({ "post_id": post_id, "user_id": user_id }))
            .await?;
        decode_inserted(rows, POST_LIKES)
    }

    /// Returns how many likes were removed
    pub async fn unlike(&self, post_id: &str, user_id: &str) -> GatewayErrorResult<usize> {
        let removed = self
            .gateway
            .delete(
                &Query::table(POST_LIKES)
                    .eq("post_id", post_id)
                    .eq("user_id", user_id),
            )
            .await?;
        Ok(removed.len())
    }
}
