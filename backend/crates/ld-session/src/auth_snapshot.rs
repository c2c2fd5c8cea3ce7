use crate::AuthPhase;

use ld_core::{Identity, Profile, Session};

/// Immutable view of the store, published on every transition.
///
/// `profile` is only ever set while `identity` is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSnapshot {
    pub phase: AuthPhase,
    pub session: Option<Session>,
    pub identity: Option<Identity>,
    pub profile: Option<Profile>,
    pub loading: bool,
}

impl AuthSnapshot {
    pub fn initial() -> Self {
        Self {
            phase: AuthPhase::Uninitialized,
            session: None,
            identity: None,
            profile: None,
            loading: true,
        }
    }

    pub fn signed_out() -> Self {
        Self {
            phase: AuthPhase::Unauthenticated,
            session: None,
            identity: None,
            profile: None,
            loading: false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase == AuthPhase::Authenticated
    }

    pub fn user_id(&self) -> Option<&str> {
        self.identity.as_ref().map(|identity| identity.id.as_str())
    }
}

impl Default for AuthSnapshot {
    fn default() -> Self {
        Self::initial()
    }
}
