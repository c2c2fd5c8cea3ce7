mod comments_reader;
mod conversations_reader;
mod directory_reader;
mod feed_reader;
mod messages_reader;

pub use comments_reader::CommentsReader;
pub use conversations_reader::ConversationsReader;
pub use directory_reader::{DirectoryQuery, DirectoryReader};
pub use feed_reader::FeedReader;
pub use messages_reader::MessagesReader;
