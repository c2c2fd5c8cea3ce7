//! Backend Gateway: the auth and table APIs of the hosted backend, with an
//! HTTP implementation, an in-memory one, and typed repositories on top.

mod auth_api;
mod backend_gateway;
mod change_event;
mod change_filter;
mod error;
mod event_bus;
mod http;
mod memory;
mod query;
mod repositories;
mod session_event;
mod storage;
mod table_api;

pub mod tables;

#[cfg(test)]
mod tests;

pub use auth_api::{AuthApi, SignUpOutcome};
pub use backend_gateway::BackendGateway;
pub use change_event::{ChangeEvent, ChangeKind};
pub use change_filter::{ChangeFilter, ChangeSubscription};
pub use error::{GatewayError, Result};
pub use event_bus::{EventBus, Subscription};
pub use http::{HttpGateway, RefreshHandle};
pub use memory::{FaultOp, GatewayCall, MemoryGateway};
pub use query::{Filter, Query, SortOrder};
pub use repositories::{
    CommentRepository, ConversationRepository, MessageRepository, PostRepository,
    ProfessionalRepository, ProfileRepository,
};
pub use session_event::{SessionEvent, SessionEventKind};
pub use storage::{FileSessionStorage, MemorySessionStorage, SessionStorage};
pub use table_api::TableApi;
