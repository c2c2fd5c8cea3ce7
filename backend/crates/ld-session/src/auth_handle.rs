use crate::AuthSnapshot;

use ld_core::Identity;
use tokio::sync::watch;

/// Read-only view of the session store for collaborators.
#[derive(Clone)]
pub struct AuthHandle {
    receiver: watch::Receiver<AuthSnapshot>,
}

impl AuthHandle {
    pub(crate) fn new(receiver: watch::Receiver<AuthSnapshot>) -> Self {
        Self { receiver }
    }

    pub fn current(&self) -> AuthSnapshot {
        self.receiver.borrow().clone()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.receiver.borrow().identity.clone()
    }

    pub fn user_id(&self) -> Option<String> {
        self.receiver.borrow().user_id().map(String::from)
    }

    /// Wait for the next published snapshot. False once the store is gone.
    pub async fn changed(&mut self) -> bool {
        self.receiver.changed().await.is_ok()
    }

    /// Wait until a snapshot satisfies `predicate` (checked immediately first).
    pub async fn wait_for<F>(&mut self, mut predicate: F) -> Option<AuthSnapshot>
    where
        F: FnMut(&AuthSnapshot) -> bool,
    {
        self.receiver
            .wait_for(|snapshot| predicate(snapshot))
            .await
            .ok()
            .map(|snapshot| snapshot.clone())
    }
}
