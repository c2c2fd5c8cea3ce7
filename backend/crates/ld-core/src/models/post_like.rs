use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostLike {
    pub post_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}
