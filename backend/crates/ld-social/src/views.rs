use ld_core::{Comment, Conversation, HealthProfessional, Message, Post, Profile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostView {
    pub post: Post,
    pub author: Option<Profile>,
    pub likes_count: usize,
    pub comments_count: usize,
    /// Whether the acting member liked the post
    pub is_liked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentView {
    pub comment: Comment,
    pub author: Option<Profile>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationView {
    pub conversation: Conversation,
    /// Every member, the acting one included
    pub participants: Vec<Profile>,
    pub last_message: Option<Message>,
}

impl ConversationView {
    /// Participants other than `user_id`
    pub fn others<'a>(&'a self, user_id: &'a str) -> impl Iterator<Item = &'a Profile> + 'a {
        self.participants
            .iter()
            .filter(move |profile| profile.id != user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    pub message: Message,
    pub sender: Option<Profile>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfessionalView {
    pub professional: HealthProfessional,
    pub profile: Option<Profile>,
}

impl ProfessionalView {
    pub fn display_name(&self) -> &str {
        self.profile
            .as_ref()
            .map(Profile::display_name)
            .unwrap_or("?")
    }
}
