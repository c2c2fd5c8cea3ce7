use crate::{Result as GatewayErrorResult, SessionEvent, Subscription};

use async_trait::async_trait;
use ld_core::{Credentials, Identity, Session, SignUpMetadata};

/// Result of creating an account. `session` is None when the backend
/// requires email confirmation before issuing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpOutcome {
    pub identity: Identity,
    pub session: Option<Session>,
}

/// Credential-based session issuance and the session-change channel.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Session restored from storage, if any
    async fn get_persisted_session(&self) -> GatewayErrorResult<Option<Session>>;

    /// Register for pushed session changes; dropping the handle unregisters
    fn on_session_changed(&self) -> Subscription<SessionEvent>;

    async fn sign_in_with_password(&self, credentials: &Credentials)
    -> GatewayErrorResult<Session>;

    async fn sign_up(
        &self,
        credentials: &Credentials,
        metadata: &SignUpMetadata,
    ) -> GatewayErrorResult<SignUpOutcome>;

    async fn sign_out(&self) -> GatewayErrorResult<()>;

    async fn refresh_session(&self) -> GatewayErrorResult<Session>;
}
