pub mod comment;
pub mod conversation;
pub mod conversation_participant;
pub mod credentials;
pub mod health_professional;
pub mod identity;
pub mod message;
pub mod post;
pub mod post_like;
pub mod profile;
pub mod session;
pub mod sign_up;
