use crate::profile_index::ProfileIndex;
use crate::view_state::ViewStore;
use crate::{MessageView, Reader, Result as SocialErrorResult, SocialError, ViewState};

use std::sync::Arc;

use async_trait::async_trait;
use ld_core::Message;
use ld_gateway::tables::MESSAGES;
use ld_gateway::{
    ChangeFilter, ChangeKind, ConversationRepository, MessageRepository,
    Result as GatewayErrorResult, TableApi,
};
use ld_session::AuthHandle;
use log::{error, warn};
use tokio::sync::watch;

/// Messages of one conversation, oldest first.
pub struct MessagesReader {
    gateway: Arc<dyn TableApi>,
    auth: AuthHandle,
    conversation_id: String,
    view: ViewStore<MessageView>,
}

impl MessagesReader {
    pub fn new(
        gateway: Arc<dyn TableApi>,
        auth: AuthHandle,
        conversation_id: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            auth,
            conversation_id: conversation_id.into(),
            view: ViewStore::new(),
        }
    }

    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    pub fn state(&self) -> ViewState<MessageView> {
        self.view.state()
    }

    pub fn watch(&self) -> watch::Receiver<ViewState<MessageView>> {
        self.view.subscribe()
    }

    /// Send as the acting member, then mark the conversation active.
    ///
    /// A failed bump is logged; the message is already stored.
    pub async fn send_message(&self, content: &str) -> SocialErrorResult<Message> {
        let user_id = self.auth.user_id().ok_or_else(SocialError::not_authenticated)?;
        let gateway = self.gateway.as_ref();

        let message = MessageRepository::new(gateway)
            .create(&self.conversation_id, &user_id, content)
            .await?;

        if let Err(e) = ConversationRepository::new(gateway)
            .touch(&self.conversation_id)
            .await
        {
            warn!(
                "Failed to bump conversation {}: {}",
                self.conversation_id, e
            );
        }

        self.refresh().await;
        Ok(message)
    }

    async fn fetch(&self) -> GatewayErrorResult<Vec<MessageView>> {
        let gateway = self.gateway.as_ref();
        let messages = MessageRepository::new(gateway)
            .find_by_conversation(&self.conversation_id)
            .await?;
        let senders = ProfileIndex::load(
            gateway,
            messages.iter().map(|message| message.sender_id.as_str()),
        )
        .await?;

        Ok(messages
            .into_iter()
            .map(|message| MessageView {
                sender: senders.get(&message.sender_id),
                message,
            })
            .collect())
    }
}

#[async_trait]
impl Reader for MessagesReader {
    fn name(&self) -> &'static str {
        "messages"
    }

    fn change_filters(&self) -> Vec<ChangeFilter> {
        vec![
            ChangeFilter::table(MESSAGES)
                .on(ChangeKind::Insert)
                .where_eq("conversation_id", self.conversation_id.as_str()),
        ]
    }

    async fn refresh(&self) {
        match self.fetch().await {
            Ok(messages) => self.view.replace(messages),
            Err(e) => {
                error!(
                    "Error fetching messages of {}: {}",
                    self.conversation_id, e
                );
                self.view.settle();
            }
        }
    }
}
