use async_trait::async_trait;
use ld_gateway::ChangeFilter;
use ld_session::AuthHandle;

/// A view over backend rows that can be re-fetched.
#[async_trait]
pub trait Reader: Send + Sync + 'static {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Change notifications that make the view stale
    fn change_filters(&self) -> Vec<ChangeFilter>;

    /// Session whose member the view depends on. A live view re-subscribes
    /// and re-fetches whenever that member changes.
    fn auth(&self) -> Option<AuthHandle> {
        None
    }

    /// Re-query the backend and republish the view.
    ///
    /// Failures are logged; the previous items stay and `loading` is cleared.
    async fn refresh(&self);
}
