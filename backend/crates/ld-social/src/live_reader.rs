use crate::Reader;

use std::future::pending;
use std::ops::Deref;
use std::sync::Arc;

use ld_gateway::{ChangeEvent, TableApi};
use ld_session::AuthHandle;
use log::{debug, info};
use tokio::task::JoinHandle;

/// What woke the follow loop
enum Wake {
    Change(ChangeEvent),
    MemberChanged(Option<String>),
    Closed,
}

/// Keeps a reader fresh: re-fetches on every matching change notification,
/// and on every change of the member the view is scoped to, until dropped.
pub struct LiveReader<R: Reader> {
    reader: Arc<R>,
    task: JoinHandle<()>,
}

impl<R: Reader> LiveReader<R> {
    /// Subscribe to the reader's changes, run the first fetch, then follow.
    ///
    /// The subscription is taken before the first fetch so nothing committed
    /// in between is missed.
    pub async fn start(reader: R, gateway: Arc<dyn TableApi>) -> Self {
        let reader = Arc::new(reader);
        let mut auth = reader.auth();
        let mut member = auth.as_ref().and_then(AuthHandle::user_id);
        let mut changes = gateway.subscribe(reader.change_filters());

        reader.refresh().await;

        let follower = Arc::clone(&reader);
        let task = tokio::spawn(async move {
            loop {
                let wake = tokio::select! {
                    event = changes.recv() => match event {
                        Some(event) => Wake::Change(event),
                        None => Wake::Closed,
                    },
                    user_id = next_member(&mut auth, member.clone()) => Wake::MemberChanged(user_id),
                };

                match wake {
                    Wake::Change(event) => {
                        debug!(
                            "{} refreshing after {:?} on {}",
                            follower.name(),
                            event.kind,
                            event.table
                        );
                    }
                    Wake::MemberChanged(user_id) => {
                        debug!("{} refreshing for member {:?}", follower.name(), user_id);
                        member = user_id;
                        changes = gateway.subscribe(follower.change_filters());
                    }
                    Wake::Closed => break,
                }
                follower.refresh().await;
            }
            debug!("{} change stream closed", follower.name());
        });

        info!("{} started", reader.name());
        Self { reader, task }
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub fn is_following(&self) -> bool {
        !self.task.is_finished()
    }
}

/// Resolves with the new member id once it differs from `current`. Never
/// resolves for unscoped views or once the session store is gone.
async fn next_member(auth: &mut Option<AuthHandle>, current: Option<String>) -> Option<String> {
    let Some(handle) = auth else {
        return pending().await;
    };

    loop {
        if !handle.changed().await {
            return pending().await;
        }
        let user_id = handle.user_id();
        if user_id != current {
            return user_id;
        }
    }
}

impl<R: Reader> Deref for LiveReader<R> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.reader
    }
}

impl<R: Reader> Drop for LiveReader<R> {
    fn drop(&mut self) {
        self.task.abort();
        debug!("{} stopped", self.reader.name());
    }
}
