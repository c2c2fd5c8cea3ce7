use crate::repositories::{decode_inserted, decode_rows};
use crate::tables::{CONVERSATION_PARTICIPANTS, CONVERSATIONS};
use crate::{Query, Result as GatewayErrorResult, SortOrder, TableApi};

use chrono::{SecondsFormat, Utc};
use ld_core::{Conversation, ConversationParticipant};
use serde_json::{Value, json};

pub struct ConversationRepository<'a> {
    gateway: &'a dyn TableApi,
}

impl<'a> ConversationRepository<'a> {
    pub fn new(gateway: &'a dyn TableApi) -> Self {
        Self { gateway }
    }

    /// Memberships of one user
    pub async fn participations_of(
        &self,
        user_id: &str,
    ) -> GatewayErrorResult<Vec<ConversationParticipant>> {
        let rows = self
            .gateway
            .select(&Query::table(CONVERSATION_PARTICIPANTS).eq("user_id", user_id))
            .await?;
        decode_rows(rows)
    }

    /// Conversations by id, most recently active first
    pub async fn find_many(&self, ids: &[String]) -> GatewayErrorResult<Vec<Conversation>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = self
            .gateway
            .select(
                &Query::table(CONVERSATIONS)
                    .in_list("id", ids.iter().cloned())
                    .order("updated_at", SortOrder::Descending),
            )
            .await?;
        decode_rows(rows)
    }

    /// Every membership of the given conversations
    pub async fn participants_of(
        &self,
        conversation_ids: &[String],
    ) -> GatewayErrorResult<Vec<ConversationParticipant>> {
        if conversation_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = self
            .gateway
            .select(
                &Query::table(CONVERSATION_PARTICIPANTS)
                    .in_list("conversation_id", conversation_ids.iter().cloned()),
            )
            .await?;
        decode_rows(rows)
    }

    pub async fn create(&self) -> GatewayErrorResult<Conversation> {
        let rows = self.gateway.insert(CONVERSATIONS, json!({})).await?;
        decode_inserted(rows, CONVERSATIONS)
    }

    pub async fn add_participants(
        &self,
        conversation_id: &str,
        user_ids: &[String],
    ) -> GatewayErrorResult<Vec<ConversationParticipant>> {
        let rows: Vec<Value> = user_ids
            .iter()
            .map(|user_id| json!({ "conversation_id": conversation_id, "user_id": user_id }))
            .collect();

        let stored = self
            .gateway
            .insert(CONVERSATION_PARTICIPANTS, Value::Array(rows))
            .await?;
        decode_rows(stored)
    }

    /// Bump `updated_at` so the conversation sorts as recently active.
    pub async fn touch(&self, conversation_id: &str) -> GatewayErrorResult<()> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        self.gateway
            .update(
                &Query::table(CONVERSATIONS).eq("id", conversation_id),
                json!({ "updated_at": now }),
            )
            .await?;
        Ok(())
    }
}
