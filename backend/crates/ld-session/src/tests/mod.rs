
use crate::{SessionStore, SessionStoreOptions};

use std::sync::Arc;
use std::time::Duration;

use ld_core::{Credentials, Identity};
use ld_gateway::{BackendGateway, MemoryGateway};

pub(crate) const EMAIL: &str = "awa@district.ci";
pub(crate) const PASSWORD: &str = "secret1";

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

pub(crate) fn store_for(gateway: &Arc<MemoryGateway>, demo_enabled: bool) -> SessionStore {
    let backend: Arc<dyn BackendGateway> = gateway.clone();
    SessionStore::new(backend, SessionStoreOptions { demo_enabled })
}

/// Gateway with one account ("Awa Koné") and a bootstrapped, signed-out store
pub(crate) async fn bootstrapped_store() -> (Arc<MemoryGateway>, SessionStore, Identity) {
    let gateway = Arc::new(MemoryGateway::new());
    let identity = gateway.add_account(EMAIL, PASSWORD, Some("Awa Koné")).await;
    let store = store_for(&gateway, true);
    store.bootstrap().await.unwrap();
    (gateway, store, identity)
}

pub(crate) fn credentials() -> Credentials {
    Credentials::new(EMAIL, PASSWORD)
}
