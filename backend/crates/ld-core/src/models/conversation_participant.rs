use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationParticipant {
    pub conversation_id: String,
    pub user_id: String,
    pub joined_at: DateTime<Utc>,
}
