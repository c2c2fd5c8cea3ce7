use crate::{GatewayError, Result as GatewayErrorResult, SessionStorage};

use std::sync::Mutex;

use ld_core::Session;

/// Session kept for the lifetime of the process only.
#[derive(Default)]
pub struct MemorySessionStorage {
    slot: Mutex<Option<Session>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            slot: Mutex::new(Some(session)),
        }
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> GatewayErrorResult<Option<Session>> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| GatewayError::storage("session slot poisoned"))?;
        Ok(slot.clone())
    }

    fn save(&self, session: &Session) -> GatewayErrorResult<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| GatewayError::storage("session slot poisoned"))?;
        *slot = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> GatewayErrorResult<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| GatewayError::storage("session slot poisoned"))?;
        *slot = None;
        Ok(())
    }
}
