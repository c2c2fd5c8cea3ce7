use crate::profile_index::ProfileIndex;
use crate::view_state::ViewStore;
use crate::{CommentView, Reader, Result as SocialErrorResult, SocialError, ViewState};

use std::sync::Arc;

use async_trait::async_trait;
use ld_core::Comment;
use ld_gateway::tables::COMMENTS;
use ld_gateway::{
    ChangeFilter, ChangeKind, CommentRepository, Result as GatewayErrorResult, TableApi,
};
use ld_session::AuthHandle;
use log::error;
use tokio::sync::watch;

/// Comments of one post, oldest first.
pub struct CommentsReader {
    gateway: Arc<dyn TableApi>,
    auth: AuthHandle,
    post_id: String,
    view: ViewStore<CommentView>,
}

impl CommentsReader {
    pub fn new(gateway: Arc<dyn TableApi>, auth: AuthHandle, post_id: impl Into<String>) -> Self {
        Self {
            gateway,
            auth,
            post_id: post_id.into(),
            view: ViewStore::new(),
        }
    }

    pub fn post_id(&self) -> &str {
        &self.post_id
    }

    pub fn state(&self) -> ViewState<CommentView> {
        self.view.state()
    }

    pub fn watch(&self) -> watch::Receiver<ViewState<CommentView>> {
        self.view.subscribe()
    }

    pub async fn add_comment(&self, content: &str) -> SocialErrorResult<Comment> {
        let user_id = self.auth.user_id().ok_or_else(SocialError::not_authenticated)?;

        let comment = CommentRepository::new(self.gateway.as_ref())
            .create(&self.post_id, &user_id, content)
            .await?;

        self.refresh().await;
        Ok(comment)
    }

    async fn fetch(&self) -> GatewayErrorResult<Vec<CommentView>> {
        let gateway = self.gateway.as_ref();
        let comments = CommentRepository::new(gateway)
            .find_by_post(&self.post_id)
            .await?;
        let authors = ProfileIndex::load(
            gateway,
            comments.iter().map(|comment| comment.author_id.as_str()),
        )
        .await?;

        Ok(comments
            .into_iter()
            .map(|comment| CommentView {
                author: authors.get(&comment.author_id),
                comment,
            })
            .collect())
    }
}

#[async_trait]
impl Reader for CommentsReader {
    fn name(&self) -> &'static str {
        "comments"
    }

    fn change_filters(&self) -> Vec<ChangeFilter> {
        vec![
            ChangeFilter::table(COMMENTS)
                .on(ChangeKind::Insert)
                .where_eq("post_id", self.post_id.as_str()),
        ]
    }

    async fn refresh(&self) {
        match self.fetch().await {
            Ok(comments) => self.view.replace(comments),
            Err(e) => {
                error!("Error fetching comments of {}: {}", self.post_id, e);
                self.view.settle();
            }
        }
    }
}
