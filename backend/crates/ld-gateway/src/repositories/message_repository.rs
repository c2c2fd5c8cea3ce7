use crate::repositories::{decode_inserted, decode_rows};
use crate::tables::MESSAGES;
use crate::{Query, Result as GatewayErrorResult, SortOrder, TableApi};

use ld_core::Message;
use serde_json::json;

pub struct MessageRepository<'a> {
    gateway: &'a dyn TableApi,
}

impl<'a> MessageRepository<'a> {
    pub fn new(gateway: &'a dyn TableApi) -> Self {
        Self { gateway }
    }

    /// Messages of a conversation, oldest first
    pub async fn find_by_conversation(
        &self,
        conversation_id: &str,
    ) -> GatewayErrorResult<Vec<Message>> {
        let rows = self
            .gateway
            .select(
                &Query::table(MESSAGES)
                    .eq("conversation_id", conversation_id)
                    .order("created_at", SortOrder::Ascending),
            )
            .await?;
        decode_rows(rows)
    }

    /// Messages of several conversations, newest first. Callers keep the
    /// first one per conversation.
    pub async fn latest_in(
        &self,
        conversation_ids: &[String],
    ) -> GatewayErrorResult<Vec<Message>> {
        if conversation_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = self
            .gateway
            .select(
                &Query::table(MESSAGES)
                    .in_list("conversation_id", conversation_ids.iter().cloned())
                    .order("created_at", SortOrder::Descending),
            )
            .await?;
        decode_rows(rows)
    }

    pub async fn create(
        &self,
        conversation_id: &str,
        sender_id: &str,
        content: &str,
    ) -> GatewayErrorResult<Message> {
        let rows = self
            .gateway
            .insert(
                MESSAGES,
                json!({
                    "conversation_id": conversation_id,
                    "sender_id": sender_id,
                    "content": content,
                }),
            )
            .await?;
        decode_inserted(rows, MESSAGES)
    }
}
