
use crate::{App, Commands, Result as CliErrorResult};

use std::sync::Arc;

use ld_gateway::{BackendGateway, MemoryGateway};
use ld_session::SessionStoreOptions;

pub(crate) const EMAIL: &str = "awa@district.ci";
pub(crate) const PASSWORD: &str = "secret1";

/// An app over a memory backend holding "Awa Koné"
pub(crate) async fn app_with_member() -> (Arc<MemoryGateway>, App) {
    let gateway = Arc::new(MemoryGateway::new());
    gateway.add_account(EMAIL, PASSWORD, Some("Awa Koné")).await;

    let backend: Arc<dyn BackendGateway> = gateway.clone();
    let app = App::new(
        backend,
        SessionStoreOptions {
            demo_enabled: true,
        },
    );
    (gateway, app)
}

/// Run `command` and return what it printed
pub(crate) async fn run(app: &App, command: Commands) -> CliErrorResult<String> {
    let mut out = Vec::new();
    app.run(command, &mut out).await?;
    Ok(String::from_utf8(out).unwrap())
}

pub(crate) fn sign_in() -> Commands {
    Commands::SignIn {
        email: String::from(EMAIL),
        password: String::from(PASSWORD),
    }
}
