use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A messaging thread. `updated_at` is bumped on every new message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
