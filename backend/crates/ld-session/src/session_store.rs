use crate::{
    AuthHandle, AuthPhase, AuthSnapshot, Result as SessionErrorResult, SessionError,
    SessionStoreOptions, SignInMethod,
};

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use ld_core::{CoreError, Credentials, Session, SignUpRequest};
use ld_gateway::{
    BackendGateway, GatewayError, ProfessionalRepository, ProfileRepository, SessionEvent,
};
use log::{debug, error, info, warn};
use tokio::sync::{Mutex, MutexGuard, watch};
use tokio::task::JoinHandle;

/// How a newly adopted session treats the profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProfileFetch {
    /// Fetch only when the identity changed
    OnIdentityChange,
    /// Leave the profile pending; the caller reloads it later
    Deferred,
}

struct StoreInner {
    gateway: Arc<dyn BackendGateway>,
    options: SessionStoreOptions,
    /// Authoritative state. Held across the profile fetch so transitions
    /// never interleave.
    state: Mutex<AuthSnapshot>,
    snapshot_tx: watch::Sender<AuthSnapshot>,
    applied_events: AtomicU64,
}

impl StoreInner {
    fn publish(&self, state: &AuthSnapshot) {
        self.snapshot_tx.send_replace(state.clone());
    }

    async fn handle_event(&self, event: SessionEvent) {
        let count = self.applied_events.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(
            "Session event {:?} for {:?} (#{})",
            event.kind,
            event.identity().map(|identity| identity.id.as_str()),
            count
        );
        self.apply_session(event.session, ProfileFetch::OnIdentityChange)
            .await;
    }

    /// Replace the current session with `session`, or clear everything when None.
    ///
    /// A session for the identity already held only swaps the token.
    async fn apply_session(&self, session: Option<Session>, fetch: ProfileFetch) {
        let mut state = self.state.lock().await;

        let Some(session) = session else {
            if let Some(user_id) = state.user_id() {
                info!("Session ended for {}", user_id);
            }
            *state = AuthSnapshot::signed_out();
            self.publish(&state);
            return;
        };

        let same_identity = state
            .identity
            .as_ref()
            .is_some_and(|identity| identity.id == session.user.id);

        if same_identity {
            state.identity = Some(session.user.clone());
            state.session = Some(session);
            self.publish(&state);
            return;
        }

        info!("Session adopted for {}", session.subject_id());
        state.identity = Some(session.user.clone());
        state.session = Some(session);
        state.profile = None;
        state.phase = AuthPhase::ProfileLoading;
        state.loading = true;
        self.publish(&state);

        if fetch == ProfileFetch::OnIdentityChange {
            self.load_profile(&mut state).await;
        }
    }

    /// Fetch the profile of the held identity and settle in `Authenticated`.
    ///
    /// A failed fetch is logged and leaves the profile empty.
    async fn load_profile(&self, state: &mut MutexGuard<'_, AuthSnapshot>) {
        let Some(user_id) = state.user_id().map(String::from) else {
            return;
        };

        match ProfileRepository::new(self.gateway.as_ref())
            .find_by_id(&user_id)
            .await
        {
            Ok(profile) => {
                debug!("Profile loaded for {}", user_id);
                state.profile = Some(profile);
            }
            Err(e) => {
                error!("Error fetching profile for {}: {}", user_id, e);
                state.profile = None;
            }
        }

        state.phase = AuthPhase::Authenticated;
        state.loading = false;
        self.publish(state);
    }

    async fn reload_profile(&self) {
        let mut state = self.state.lock().await;
        if state.identity.is_none() {
            return;
        }

        state.phase = AuthPhase::ProfileLoading;
        state.loading = true;
        self.publish(&state);
        self.load_profile(&mut state).await;
    }

    #[cfg(feature = "demo")]
    async fn enter_demo(&self) {
        let mut state = self.state.lock().await;
        *state = AuthSnapshot {
            phase: AuthPhase::Authenticated,
            session: Some(crate::demo::demo_session()),
            identity: Some(crate::demo::demo_identity()),
            profile: Some(crate::demo::demo_profile()),
            loading: false,
        };
        info!("Signed in with the demo account");
        self.publish(&state);
    }

    #[cfg(feature = "demo")]
    async fn holds_demo_session(&self) -> bool {
        let state = self.state.lock().await;
        state
            .session
            .as_ref()
            .is_some_and(crate::demo::is_demo_session)
    }

    #[cfg(not(feature = "demo"))]
    async fn holds_demo_session(&self) -> bool {
        false
    }
}

/// Owner of the authentication lifecycle.
///
/// Reacts to direct sign-in/up/out calls and to session changes pushed by the
/// gateway, and publishes an [`AuthSnapshot`] after every transition.
/// Collaborators read it through an [`AuthHandle`].
pub struct SessionStore {
    inner: Arc<StoreInner>,
    listener: StdMutex<Option<JoinHandle<()>>>,
    stop_tx: watch::Sender<bool>,
    bootstrapped: AtomicBool,
}

impl SessionStore {
    pub fn new(gateway: Arc<dyn BackendGateway>, options: SessionStoreOptions) -> Self {
        let (snapshot_tx, _) = watch::channel(AuthSnapshot::initial());

        Self {
            inner: Arc::new(StoreInner {
                gateway,
                options,
                state: Mutex::new(AuthSnapshot::initial()),
                snapshot_tx,
                applied_events: AtomicU64::new(0),
            }),
            listener: StdMutex::new(None),
            stop_tx: watch::channel(false).0,
            bootstrapped: AtomicBool::new(false),
        }
    }

    pub fn handle(&self) -> AuthHandle {
        AuthHandle::new(self.inner.snapshot_tx.subscribe())
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        self.inner.snapshot_tx.borrow().clone()
    }

    pub fn is_bootstrapped(&self) -> bool {
        self.bootstrapped.load(Ordering::SeqCst)
    }

    /// Number of pushed session events handled so far
    pub fn applied_events(&self) -> u64 {
        self.inner.applied_events.load(Ordering::SeqCst)
    }

    /// Subscribe to session changes and restore the persisted session.
    ///
    /// Runs once; later calls return immediately. A failed restore leaves the
    /// store `Unauthenticated` and reports the error.
    pub async fn bootstrap(&self) -> SessionErrorResult<AuthSnapshot> {
        if self.bootstrapped.swap(true, Ordering::SeqCst) {
            debug!("Session store already bootstrapped");
            return Ok(self.snapshot());
        }

        let mut subscription = self.inner.gateway.on_session_changed();
        let mut stop = self.stop_tx.subscribe();
        let inner = Arc::clone(&self.inner);
        // An event already being applied runs to completion; the stop signal
        // is only observed between events.
        let task = tokio::spawn(async move {
            loop {
                if *stop.borrow_and_update() {
                    break;
                }
                tokio::select! {
                    _ = stop.changed() => break,
                    event = subscription.recv() => match event {
                        Some(event) => inner.handle_event(event).await,
                        None => {
                            debug!("Session event stream closed");
                            break;
                        }
                    },
                }
            }
            debug!("Session listener stopped");
        });

        match self.listener.lock() {
            Ok(mut listener) => *listener = Some(task),
            Err(_) => {
                warn!("Session listener slot poisoned, stopping listener");
                task.abort();
            }
        }

        match self.inner.gateway.get_persisted_session().await {
            Ok(Some(session)) => {
                self.inner
                    .apply_session(Some(session), ProfileFetch::OnIdentityChange)
                    .await;
            }
            Ok(None) => {
                debug!("No persisted session");
                self.inner.apply_session(None, ProfileFetch::OnIdentityChange).await;
            }
            Err(e) => {
                error!("Failed to restore session: {}", e);
                self.inner.apply_session(None, ProfileFetch::OnIdentityChange).await;
                return Err(SessionError::authentication(e.user_message()));
            }
        }

        Ok(self.snapshot())
    }

    /// Sign in with email and password.
    ///
    /// The session returned by the backend is adopted right away; the matching
    /// pushed event is then a no-op. On failure the state is left untouched.
    pub async fn sign_in(&self, credentials: Credentials) -> SessionErrorResult<AuthSnapshot> {
        match SignInMethod::classify(credentials, self.inner.options.demo_enabled) {
            #[cfg(feature = "demo")]
            SignInMethod::Demo => {
                self.inner.enter_demo().await;
            }
            SignInMethod::Password(credentials) => {
                let session = self
                    .inner
                    .gateway
                    .sign_in_with_password(&credentials)
                    .await
                    .map_err(|e| {
                        warn!("Sign-in failed for {}: {}", credentials.email, e);
                        SessionError::authentication(e.user_message())
                    })?;

                self.inner
                    .apply_session(Some(session), ProfileFetch::OnIdentityChange)
                    .await;
            }
        }

        Ok(self.snapshot())
    }

    /// Create an account, write the profile fields and the professional record,
    /// then reload the profile.
    ///
    /// A failed write after the account exists is reported as `ProfileUpdate`;
    /// the account and session are kept and the profile stays incomplete.
    pub async fn sign_up(&self, request: SignUpRequest) -> SessionErrorResult<AuthSnapshot> {
        request
            .validate()
            .map_err(|CoreError::Validation { message, .. }| SessionError::validation(message))?;

        let outcome = self
            .inner
            .gateway
            .sign_up(&request.credentials, &request.metadata())
            .await
            .map_err(|e| {
                warn!("Sign-up failed for {}: {}", request.credentials.email, e);
                SessionError::authentication(e.user_message())
            })?;

        let user_id = outcome.identity.id.clone();
        if let Some(session) = outcome.session {
            self.inner
                .apply_session(Some(session), ProfileFetch::Deferred)
                .await;
        } else {
            info!("Account {} created, confirmation pending", user_id);
        }

        let written = self.write_sign_up_records(&user_id, &request).await;
        self.inner.reload_profile().await;
        written?;

        Ok(self.snapshot())
    }

    async fn write_sign_up_records(
        &self,
        user_id: &str,
        request: &SignUpRequest,
    ) -> SessionErrorResult<()> {
        let gateway = self.inner.gateway.as_ref();
        let into_profile_error = |e: GatewayError| {
            error!("Sign-up profile write failed for {}: {}", user_id, e);
            SessionError::profile_update(e.user_message())
        };

        ProfileRepository::new(gateway)
            .update(user_id, &request.profile)
            .await
            .map_err(into_profile_error)?;

        if let Some(record) = request.professional_record() {
            ProfessionalRepository::new(gateway)
                .insert(user_id, &record)
                .await
                .map_err(into_profile_error)?;
        }

        Ok(())
    }

    /// End the session. On failure the state is left untouched.
    ///
    /// A demo session always ends locally. The gateway is still asked to end
    /// any real session it holds from before the demo sign-in.
    pub async fn sign_out(&self) -> SessionErrorResult<()> {
        if self.inner.holds_demo_session().await {
            if let Err(e) = self.inner.gateway.sign_out().await {
                warn!("Gateway sign-out while leaving the demo account failed: {}", e);
            }
            self.inner
                .apply_session(None, ProfileFetch::OnIdentityChange)
                .await;
            return Ok(());
        }

        self.inner.gateway.sign_out().await.map_err(|e| {
            warn!("Sign-out failed: {}", e);
            SessionError::authentication(e.user_message())
        })?;

        self.inner
            .apply_session(None, ProfileFetch::OnIdentityChange)
            .await;
        Ok(())
    }

    /// Re-fetch the profile of the current identity, e.g. after editing it.
    ///
    /// The demo profile is fixed and never fetched.
    pub async fn refresh_profile(&self) -> SessionErrorResult<AuthSnapshot> {
        let snapshot = self.snapshot();
        if snapshot.identity.is_none() {
            return Err(SessionError::not_found("no signed-in member"));
        }
        if self.inner.holds_demo_session().await {
            debug!("Demo profile kept as is");
            return Ok(snapshot);
        }

        self.inner.reload_profile().await;
        Ok(self.snapshot())
    }

    /// Stop listening for session changes. Safe to call more than once.
    ///
    /// Profile fetches already in flight are not cancelled and still publish
    /// their result.
    pub fn dispose(&self) {
        self.stop_tx.send_replace(true);

        let task = match self.listener.lock() {
            Ok(mut listener) => listener.take(),
            Err(_) => None,
        };

        if task.is_some() {
            debug!("Session store disposed");
        }
    }
}

impl Drop for SessionStore {
    fn drop(&mut self) {
        self.dispose();
    }
}
