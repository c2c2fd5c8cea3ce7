pub mod error;
pub mod models;

mod serde_helpers;

#[cfg(test)]
mod tests;

pub use error::{CoreError, Result};
pub use models::comment::Comment;
pub use models::conversation::Conversation;
pub use models::conversation_participant::ConversationParticipant;
pub use models::credentials::Credentials;
pub use models::health_professional::HealthProfessional;
pub use models::identity::Identity;
pub use models::message::Message;
pub use models::post::Post;
pub use models::post_like::PostLike;
pub use models::profile::Profile;
pub use models::session::Session;
pub use models::sign_up::{
    DEFAULT_SPECIALTY, ProfessionalFields, ProfessionalRecord, ProfileFields, SignUpMetadata,
    SignUpRequest,
};
