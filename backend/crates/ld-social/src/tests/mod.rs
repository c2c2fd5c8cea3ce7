
use std::sync::Arc;
use std::time::Duration;

use ld_core::{Credentials, Identity};
use ld_gateway::{BackendGateway, MemoryGateway, TableApi};
use ld_session::{AuthHandle, SessionStore, SessionStoreOptions};

pub(crate) const PASSWORD: &str = "secret1";

/// A memory backend, a session store and the member it acts for.
pub(crate) struct Fixture {
    pub gateway: Arc<MemoryGateway>,
    pub tables: Arc<dyn TableApi>,
    pub store: SessionStore,
    pub member: Identity,
}

impl Fixture {
    /// "Awa Koné" signed in
    pub async fn signed_in() -> Self {
        let fixture = Self::signed_out().await;
        fixture
            .store
            .sign_in(Credentials::new("awa@district.ci", PASSWORD))
            .await
            .unwrap();
        fixture
    }

    /// "Awa Koné" registered but nobody signed in
    pub async fn signed_out() -> Self {
        let gateway = Arc::new(MemoryGateway::new());
        let member = gateway
            .add_account("awa@district.ci", PASSWORD, Some("Awa Koné"))
            .await;

        let backend: Arc<dyn BackendGateway> = gateway.clone();
        let store = SessionStore::new(
            backend,
            SessionStoreOptions {
                demo_enabled: false,
            },
        );
        store.bootstrap().await.unwrap();

        let tables: Arc<dyn TableApi> = gateway.clone();
        Self {
            gateway,
            tables,
            store,
            member,
        }
    }

    pub async fn add_member(&self, email: &str, full_name: &str) -> Identity {
        self.gateway
            .add_account(email, PASSWORD, Some(full_name))
            .await
    }

    pub fn auth(&self) -> AuthHandle {
        self.store.handle()
    }
}

/// Poll `condition` every 10ms for up to 2s
pub(crate) async fn wait_until<F: Fn() -> bool>(condition: F) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not met within 2s");
}
