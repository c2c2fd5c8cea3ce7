//! Table names on the backend.

pub const PROFILES: &str = "profiles";
pub const HEALTH_PROFESSIONALS: &str = "health_professionals";
pub const POSTS: &str = "posts";
pub const POST_LIKES: &str = "post_likes";
pub const COMMENTS: &str = "comments";
pub const CONVERSATIONS: &str = "conversations";
pub const CONVERSATION_PARTICIPANTS: &str = "conversation_participants";
pub const MESSAGES: &str = "messages";
