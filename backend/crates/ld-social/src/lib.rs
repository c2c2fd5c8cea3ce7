//! Readers over the social data: feed, comments, conversations, messages and
//! the professional directory.
//!
//! Each reader publishes a [`ViewState`] through a watch channel and re-fetches
//! when [`Reader::refresh`] is called. Wrap one in a [`LiveReader`] to follow
//! change notifications.

mod error;
mod live_reader;
mod profile_index;
mod reader;
mod readers;
mod view_state;
mod views;

#[cfg(test)]
mod tests;

pub use error::{Result, SocialError};
pub use live_reader::LiveReader;
pub use reader::Reader;
pub use readers::{
    CommentsReader, ConversationsReader, DirectoryQuery, DirectoryReader, FeedReader,
    MessagesReader,
};
pub use view_state::ViewState;
pub use views::{CommentView, ConversationView, MessageView, PostView, ProfessionalView};
