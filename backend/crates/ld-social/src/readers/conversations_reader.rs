use crate::profile_index::{ProfileIndex, unique_ids};
use crate::view_state::ViewStore;
use crate::{ConversationView, Reader, Result as SocialErrorResult, SocialError, ViewState};

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use ld_core::Message;
use ld_gateway::tables::CONVERSATION_PARTICIPANTS;
use ld_gateway::{
    ChangeFilter, ConversationRepository, MessageRepository, Result as GatewayErrorResult,
    TableApi,
};
use ld_session::AuthHandle;
use log::{debug, error, info};
use tokio::sync::watch;

/// Conversations of the acting member, most recently active first.
pub struct ConversationsReader {
    gateway: Arc<dyn TableApi>,
    auth: AuthHandle,
    view: ViewStore<ConversationView>,
}

impl ConversationsReader {
    pub fn new(gateway: Arc<dyn TableApi>, auth: AuthHandle) -> Self {
        Self {
            gateway,
            auth,
            view: ViewStore::new(),
        }
    }

    pub fn state(&self) -> ViewState<ConversationView> {
        self.view.state()
    }

    pub fn watch(&self) -> watch::Receiver<ViewState<ConversationView>> {
        self.view.subscribe()
    }

    /// Open a conversation between the acting member and `participant_ids`.
    ///
    /// Returns the new conversation id.
    pub async fn create_conversation(
        &self,
        participant_ids: &[String],
    ) -> SocialErrorResult<String> {
        let user_id = self.auth.user_id().ok_or_else(SocialError::not_authenticated)?;
        let repo = ConversationRepository::new(self.gateway.as_ref());

        let conversation = repo.create().await?;
        let members = unique_ids(
            std::iter::once(user_id.as_str()).chain(participant_ids.iter().map(String::as_str)),
        );
        repo.add_participants(&conversation.id, &members).await?;
        info!(
            "Conversation {} opened with {} members",
            conversation.id,
            members.len()
        );

        self.refresh().await;
        Ok(conversation.id)
    }

    async fn fetch(&self, user_id: &str) -> GatewayErrorResult<Vec<ConversationView>> {
        let gateway = self.gateway.as_ref();
        let repo = ConversationRepository::new(gateway);

        let ids: Vec<String> = repo
            .participations_of(user_id)
            .await?
            .into_iter()
            .map(|participation| participation.conversation_id)
            .collect();
        let conversations = repo.find_many(&ids).await?;
        let memberships = repo.participants_of(&ids).await?;
        let profiles = ProfileIndex::load(
            gateway,
            memberships.iter().map(|member| member.user_id.as_str()),
        )
        .await?;

        // Newest first, so the first seen per conversation is the last message
        let mut last_messages: HashMap<String, Message> = HashMap::new();
        for message in MessageRepository::new(gateway).latest_in(&ids).await? {
            last_messages
                .entry(message.conversation_id.clone())
                .or_insert(message);
        }

        Ok(conversations
            .into_iter()
            .map(|conversation| ConversationView {
                participants: memberships
                    .iter()
                    .filter(|member| member.conversation_id == conversation.id)
                    .filter_map(|member| profiles.get(&member.user_id))
                    .collect(),
                last_message: last_messages.remove(&conversation.id),
                conversation,
            })
            .collect())
    }
}

#[async_trait]
impl Reader for ConversationsReader {
    fn name(&self) -> &'static str {
        "conversations"
    }

    fn change_filters(&self) -> Vec<ChangeFilter> {
        match self.auth.user_id() {
            Some(user_id) => {
                vec![ChangeFilter::table(CONVERSATION_PARTICIPANTS).where_eq("user_id", user_id)]
            }
            None => Vec::new(),
        }
    }

    fn auth(&self) -> Option<AuthHandle> {
        Some(self.auth.clone())
    }

    async fn refresh(&self) {
        let Some(user_id) = self.auth.user_id() else {
            debug!("No member, no conversations");
            self.view.replace(Vec::new());
            return;
        };

        match self.fetch(&user_id).await {
            Ok(conversations) => self.view.replace(conversations),
            Err(e) => {
                error!("Error fetching conversations: {}", e);
                self.view.settle();
            }
        }
    }
}
