use crate::profile_index::ProfileIndex;
use crate::view_state::ViewStore;
use crate::{PostView, Reader, Result as SocialErrorResult, SocialError, ViewState};

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use ld_core::Post;
use ld_gateway::tables::{COMMENTS, POST_LIKES, POSTS};
use ld_gateway::{
    ChangeFilter, CommentRepository, PostRepository, Result as GatewayErrorResult, TableApi,
};
use ld_session::AuthHandle;
use log::{debug, error, info};
use tokio::sync::watch;

/// The social feed: every post, newest first, with its author and counters.
pub struct FeedReader {
    gateway: Arc<dyn TableApi>,
    auth: AuthHandle,
    view: ViewStore<PostView>,
}

impl FeedReader {
    pub fn new(gateway: Arc<dyn TableApi>, auth: AuthHandle) -> Self {
        Self {
            gateway,
            auth,
            view: ViewStore::new(),
        }
    }

    pub fn state(&self) -> ViewState<PostView> {
        self.view.state()
    }

    pub fn watch(&self) -> watch::Receiver<ViewState<PostView>> {
        self.view.subscribe()
    }

    /// Member-requested refresh; `refreshing` is set until it settles.
    pub async fn pull_to_refresh(&self) {
        self.view.begin_refresh();
        self.refresh().await;
    }

    pub async fn create_post(
        &self,
        content: &str,
        image_url: Option<&str>,
    ) -> SocialErrorResult<Post> {
        let user_id = self.auth.user_id().ok_or_else(SocialError::not_authenticated)?;

        let post = PostRepository::new(self.gateway.as_ref())
            .create(&user_id, content, image_url)
            .await?;
        info!("Post {} created by {}", post.id, user_id);

        self.refresh().await;
        Ok(post)
    }

    /// Like a post as the acting member. Does nothing when signed out.
    pub async fn like_post(&self, post_id: &str) -> SocialErrorResult<()> {
        let Some(user_id) = self.auth.user_id() else {
            debug!("Ignoring like on {} without a member", post_id);
            return Ok(());
        };

        PostRepository::new(self.gateway.as_ref())
            .like(post_id, &user_id)
            .await?;
        self.refresh().await;
        Ok(())
    }

    /// Remove the acting member's like. Does nothing when signed out.
    pub async fn unlike_post(&self, post_id: &str) -> SocialErrorResult<()> {
        let Some(user_id) = self.auth.user_id() else {
            debug!("Ignoring unlike on {} without a member", post_id);
            return Ok(());
        };

        PostRepository::new(self.gateway.as_ref())
            .unlike(post_id, &user_id)
            .await?;
        self.refresh().await;
        Ok(())
    }

    async fn fetch(&self) -> GatewayErrorResult<Vec<PostView>> {
        let gateway = self.gateway.as_ref();
        let posts_repo = PostRepository::new(gateway);

        let posts = posts_repo.list_recent().await?;
        let ids: Vec<String> = posts.iter().map(|post| post.id.clone()).collect();

        let likes = posts_repo.likes_for(&ids).await?;
        let comments = CommentRepository::new(gateway).find_by_posts(&ids).await?;
        let authors =
            ProfileIndex::load(gateway, posts.iter().map(|post| post.author_id.as_str())).await?;

        let user_id = self.auth.user_id();
        let mut likes_count: HashMap<&str, usize> = HashMap::new();
        let mut liked: Vec<&str> = Vec::new();
        for like in &likes {
            *likes_count.entry(like.post_id.as_str()).or_default() += 1;
            if user_id.as_deref() == Some(like.user_id.as_str()) {
                liked.push(like.post_id.as_str());
            }
        }

        let mut comments_count: HashMap<&str, usize> = HashMap::new();
        for comment in &comments {
            *comments_count.entry(comment.post_id.as_str()).or_default() += 1;
        }

        Ok(posts
            .into_iter()
            .map(|post| PostView {
                author: authors.get(&post.author_id),
                likes_count: likes_count.get(post.id.as_str()).copied().unwrap_or(0),
                comments_count: comments_count.get(post.id.as_str()).copied().unwrap_or(0),
                is_liked: liked.contains(&post.id.as_str()),
                post,
            })
            .collect())
    }
}

#[async_trait]
impl Reader for FeedReader {
    fn name(&self) -> &'static str {
        "feed"
    }

    fn change_filters(&self) -> Vec<ChangeFilter> {
        vec![
            ChangeFilter::table(POSTS),
            ChangeFilter::table(POST_LIKES),
            ChangeFilter::table(COMMENTS),
        ]
    }

    fn auth(&self) -> Option<AuthHandle> {
        Some(self.auth.clone())
    }

    async fn refresh(&self) {
        match self.fetch().await {
            Ok(posts) => self.view.replace(posts),
            Err(e) => {
                error!("Error fetching posts: {}", e);
                self.view.settle();
            }
        }
    }
}
