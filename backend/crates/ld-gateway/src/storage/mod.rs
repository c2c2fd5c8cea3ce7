mod file_session_storage;
mod memory_session_storage;

pub use file_session_storage::FileSessionStorage;
pub use memory_session_storage::MemorySessionStorage;

use crate::Result as GatewayErrorResult;

use ld_core::Session;

/// Where the gateway keeps the session between runs.
pub trait SessionStorage: Send + Sync {
    fn load(&self) -> GatewayErrorResult<Option<Session>>;

    fn save(&self, session: &Session) -> GatewayErrorResult<()>;

    fn clear(&self) -> GatewayErrorResult<()>;
}
