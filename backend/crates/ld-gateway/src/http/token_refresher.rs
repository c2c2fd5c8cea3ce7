use crate::{AuthApi, HttpGateway};

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use log::{debug, info, warn};
use tokio::task::JoinHandle;

/// Background token refresh. The task stops when the handle is dropped.
pub struct RefreshHandle {
    task: JoinHandle<()>,
}

impl RefreshHandle {
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl HttpGateway {
    /// Refresh the access token `margin` before it expires, for as long as the
    /// returned handle lives. Each refresh is announced as `TokenRefreshed`.
    pub fn spawn_auto_refresh(self: &Arc<Self>, margin: Duration) -> RefreshHandle {
        let gateway = Arc::clone(self);

        let task = tokio::spawn(async move {
            let mut events = gateway.on_session_changed();
            let mut retry_blocked = false;
            info!("Auto refresh started (margin {}s)", margin.as_secs());

            loop {
                let delay = if retry_blocked {
                    None
                } else {
                    gateway.current_session().await.and_then(|session| {
                        session
                            .seconds_until_expiry(Utc::now().timestamp())
                            .map(|secs| Duration::from_secs(secs.saturating_sub(margin.as_secs())))
                    })
                };

                match delay {
                    Some(delay) => {
                        debug!("Next token refresh in {}s", delay.as_secs());
                        tokio::select! {
                            _ = tokio::time::sleep(delay) => {
                                if let Err(e) = gateway.refresh_session().await {
                                    warn!("Token refresh failed: {}", e.user_message());
                                    retry_blocked = true;
                                }
                            }
                            event = events.recv() => {
                                if event.is_none() {
                                    break;
                                }
                            }
                        }
                    }
                    // No expiring session: wait for the next session change
                    None => match events.recv().await {
                        Some(_) => retry_blocked = false,
                        None => break,
                    },
                }
            }
        });

        RefreshHandle { task }
    }
}
