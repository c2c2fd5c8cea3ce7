use crate::{Commands, Result as CliErrorResult, render};

use std::io::{Result as IoResult, Write};
use std::sync::Arc;
use std::time::Duration;

use ld_config::Config;
use ld_core::{Credentials, ProfessionalFields, ProfileFields, SignUpRequest};
use ld_gateway::{
    BackendGateway, FileSessionStorage, HttpGateway, MemorySessionStorage, RefreshHandle,
    SessionStorage, TableApi,
};
use ld_session::{AuthPhase, SessionStore, SessionStoreOptions};
use ld_social::{
    CommentsReader, ConversationsReader, DirectoryQuery, DirectoryReader, FeedReader,
    LiveReader, MessagesReader, Reader, SocialError, ViewState,
};
use log::{debug, info, warn};
use tokio::sync::watch;

/// One run of the `district` binary: a gateway, the session store over it and
/// the optional token refresher.
pub struct App {
    gateway: Arc<dyn BackendGateway>,
    store: SessionStore,
    refresher: Option<RefreshHandle>,
}

impl App {
    pub fn new(gateway: Arc<dyn BackendGateway>, options: SessionStoreOptions) -> Self {
        let store = SessionStore::new(Arc::clone(&gateway), options);
        Self {
            gateway,
            store,
            refresher: None,
        }
    }

    /// HTTP gateway with file or memory session storage, per configuration.
    pub fn from_config(config: &Config) -> CliErrorResult<Self> {
        let storage: Arc<dyn SessionStorage> = match config.session_path()? {
            Some(path) => {
                debug!("Session persisted at {}", path.display());
                Arc::new(FileSessionStorage::new(path))
            }
            None => Arc::new(MemorySessionStorage::new()),
        };

        let http = Arc::new(HttpGateway::from_config(&config.backend, storage)?);
        let refresher = config.auth.auto_refresh.then(|| {
            http.spawn_auto_refresh(Duration::from_secs(config.auth.refresh_margin_secs))
        });

        let gateway: Arc<dyn BackendGateway> = http;
        let mut app = Self::new(gateway, SessionStoreOptions::from(&config.auth));
        app.refresher = refresher;
        Ok(app)
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    fn tables(&self) -> Arc<dyn TableApi> {
        self.gateway.clone()
    }

    /// Restore the persisted session, then run `command`, writing to `out`.
    ///
    /// A failed restore is logged; the command still runs signed out.
    pub async fn run(&self, command: Commands, out: &mut dyn Write) -> CliErrorResult<()> {
        if let Err(e) = self.store.bootstrap().await {
            warn!("Could not restore the previous session: {}", e);
        }

        if command.requires_member() && self.store.snapshot().phase != AuthPhase::Authenticated
        {
            return Err(SocialError::not_authenticated().into());
        }

        let auth = self.store.handle();
        match command {
            Commands::SignIn { email, password } => {
                let snapshot = self.store.sign_in(Credentials::new(email, password)).await?;
                render::snapshot(out, &snapshot)?;
            }
            Commands::SignUp {
                email,
                password,
                full_name,
                phone,
                district,
                specialty,
                structure,
            } => {
                let mut request = SignUpRequest::new(
                    Credentials::new(email, password),
                    ProfileFields {
                        full_name,
                        phone,
                        district,
                    },
                );
                if specialty.is_some() || structure.is_some() {
                    request = request.with_professional(ProfessionalFields {
                        specialty,
                        structure,
                    });
                }

                let snapshot = self.store.sign_up(request).await?;
                if snapshot.phase == AuthPhase::Authenticated {
                    writeln!(out, "Account created")?;
                    render::snapshot(out, &snapshot)?;
                } else {
                    writeln!(
                        out,
                        "Account created. Confirm your email, then run `district sign-in`."
                    )?;
                }
            }
            Commands::SignOut => {
                self.store.sign_out().await?;
                writeln!(out, "Signed out")?;
            }
            Commands::Whoami => render::snapshot(out, &self.store.snapshot())?,
            Commands::Feed { follow } => {
                let feed = FeedReader::new(self.tables(), auth);
                if follow {
                    let live = LiveReader::start(feed, self.tables()).await;
                    follow_view(live.watch(), out, render::posts).await?;
                } else {
                    feed.refresh().await;
                    render::posts(out, &feed.state().items)?;
                }
            }
            Commands::Post { content, image_url } => {
                let post = FeedReader::new(self.tables(), auth)
                    .create_post(&content, image_url.as_deref())
                    .await?;
                writeln!(out, "Published {}", post.id)?;
            }
            Commands::Like { post_id } => {
                FeedReader::new(self.tables(), auth)
                    .like_post(&post_id)
                    .await?;
                writeln!(out, "Liked {}", post_id)?;
            }
            Commands::Unlike { post_id } => {
                FeedReader::new(self.tables(), auth)
                    .unlike_post(&post_id)
                    .await?;
                writeln!(out, "Removed like on {}", post_id)?;
            }
            Commands::Comments { post_id } => {
                let reader = CommentsReader::new(self.tables(), auth, post_id);
                reader.refresh().await;
                render::comments(out, &reader.state().items)?;
            }
            Commands::Comment { post_id, content } => {
                let comment = CommentsReader::new(self.tables(), auth, post_id)
                    .add_comment(&content)
                    .await?;
                writeln!(out, "Commented {}", comment.id)?;
            }
            Commands::Conversations => {
                let user_id = auth.user_id().unwrap_or_default();
                let reader = ConversationsReader::new(self.tables(), auth);
                reader.refresh().await;
                render::conversations(out, &reader.state().items, &user_id)?;
            }
            Commands::StartConversation { participants } => {
                let id = ConversationsReader::new(self.tables(), auth)
                    .create_conversation(&participants)
                    .await?;
                writeln!(out, "Conversation {}", id)?;
            }
            Commands::Messages {
                conversation_id,
                follow,
            } => {
                let reader = MessagesReader::new(self.tables(), auth, conversation_id);
                if follow {
                    let live = LiveReader::start(reader, self.tables()).await;
                    follow_view(live.watch(), out, render::messages).await?;
                } else {
                    reader.refresh().await;
                    render::messages(out, &reader.state().items)?;
                }
            }
            Commands::Send {
                conversation_id,
                content,
            } => {
                let message = MessagesReader::new(self.tables(), auth, conversation_id)
                    .send_message(&content)
                    .await?;
                writeln!(out, "Sent {}", message.id)?;
            }
            Commands::Directory {
                district,
                specialty,
                search,
            } => {
                let reader = DirectoryReader::with_query(
                    self.tables(),
                    DirectoryQuery {
                        district,
                        specialty,
                        search,
                    },
                );
                reader.refresh().await;
                render::professionals(out, &reader.state().items)?;
            }
        }

        Ok(())
    }

    /// Stop the session listener and the token refresher.
    pub fn dispose(self) {
        self.store.dispose();
        drop(self.refresher);
        info!("Session closed");
    }
}

/// Print the view on every change until Ctrl-C.
async fn follow_view<T: Clone>(
    mut states: watch::Receiver<ViewState<T>>,
    out: &mut dyn Write,
    render: fn(&mut dyn Write, &[T]) -> IoResult<()>,
) -> CliErrorResult<()> {
    let initial = states.borrow_and_update().clone();
    render(out, &initial.items)?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                debug!("Interrupted, leaving follow mode");
                break;
            }
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = states.borrow_and_update().clone();
                writeln!(out)?;
                render(out, &state.items)?;
            }
        }
    }

    Ok(())
}
