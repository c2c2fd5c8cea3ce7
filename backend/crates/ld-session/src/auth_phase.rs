use std::fmt;

/// Where the store is in the authentication lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    /// Bootstrap has not resolved yet
    Uninitialized,
    /// Identity known, profile fetch in flight
    ProfileLoading,
    Authenticated,
    Unauthenticated,
}

impl AuthPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthPhase::Uninitialized => "uninitialized",
            AuthPhase::ProfileLoading => "profile-loading",
            AuthPhase::Authenticated => "authenticated",
            AuthPhase::Unauthenticated => "unauthenticated",
        }
    }
}

impl fmt::Display for AuthPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
