//! Server-issued session.

use crate::Identity;

use std::fmt;

use serde::{Deserialize, Serialize};

const DEFAULT_TOKEN_TYPE: &str = "bearer";

/// Proof of authentication issued by the backend.
///
/// Tokens are opaque to the client. `expires_at` is a Unix timestamp in seconds
/// when the backend reports one.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: Identity,
}

fn default_token_type() -> String {
    String::from(DEFAULT_TOKEN_TYPE)
}

impl Session {
    pub fn new(access_token: impl Into<String>, user: Identity) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            token_type: default_token_type(),
            expires_at: None,
            user,
        }
    }

    /// Id of the principal this session was issued for
    pub fn subject_id(&self) -> &str {
        &self.user.id
    }

    /// Sessions without an expiry never expire locally.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }

    /// Seconds left before expiry, clamped at zero.
    pub fn seconds_until_expiry(&self, now: i64) -> Option<u64> {
        self.expires_at
            .map(|exp| u64::try_from(exp.saturating_sub(now)).unwrap_or(0))
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}
