use crate::{
    AuthApi, ChangeEvent, ChangeFilter, ChangeKind, ChangeSubscription, EventBus, GatewayError,
    Query, Result as GatewayErrorResult, SessionEvent, SessionStorage, SignUpOutcome,
    Subscription, TableApi,
};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use ld_config::BackendConfig;
use ld_core::{Credentials, Identity, Session, SignUpMetadata};
use log::{debug, info, warn};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Url};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;

const AUTH_PATH: &str = "/auth/v1";
const REST_PATH: &str = "/rest/v1";
const EVENT_CAPACITY: usize = 64;

/// Gateway to a hosted backend speaking the GoTrue auth API and the
/// PostgREST table API.
///
/// Mutations issued through this gateway are echoed to change subscribers.
pub struct HttpGateway {
    base_url: String,
    anon_key: String,
    client: ReqwestClient,
    storage: Arc<dyn SessionStorage>,
    session: RwLock<Option<Session>>,
    auth_events: EventBus<SessionEvent>,
    changes: EventBus<ChangeEvent>,
}

impl HttpGateway {
    /// Create a new gateway
    ///
    /// # Arguments
    /// * `base_url` - Project URL (e.g., "https://xyzcompany.supabase.co")
    /// * `anon_key` - Public API key sent as `apikey` on every request
    /// * `timeout` - Per-request timeout
    /// * `storage` - Where the session is persisted between runs
    pub fn new(
        base_url: &str,
        anon_key: &str,
        timeout: Duration,
        storage: Arc<dyn SessionStorage>,
    ) -> GatewayErrorResult<Self> {
        let client = ReqwestClient::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            client,
            storage,
            session: RwLock::new(None),
            auth_events: EventBus::new(EVENT_CAPACITY),
            changes: EventBus::new(EVENT_CAPACITY),
        })
    }

    pub fn from_config(
        config: &BackendConfig,
        storage: Arc<dyn SessionStorage>,
    ) -> GatewayErrorResult<Self> {
        Self::new(
            &config.resolved_url(),
            &config.resolved_anon_key(),
            Duration::from_secs(config.request_timeout_secs),
            storage,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn current_session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    pub fn session_subscriptions(&self) -> usize {
        self.auth_events.active_subscriptions()
    }

    pub fn change_subscriptions(&self) -> usize {
        self.changes.active_subscriptions()
    }

    // =========================================================================
    // Request plumbing
    // =========================================================================

    fn auth_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, AUTH_PATH, path)
    }

    fn rest_url(&self, query: &Query) -> GatewayErrorResult<Url> {
        let raw = format!("{}{}/{}", self.base_url, REST_PATH, query.table_name());
        let mut url =
            Url::parse(&raw).map_err(|e| GatewayError::invalid_url(&raw, e.to_string()))?;

        let params = query.to_query_params();
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &params {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Build a request carrying the API key and a bearer token: the session's
    /// access token when signed in, else the anon key.
    async fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let bearer = match self.session.read().await.as_ref() {
            Some(session) => session.access_token.clone(),
            None => self.anon_key.clone(),
        };

        debug!("{} {}", method, url.path());
        self.client
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }

    fn auth_request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!("{} {}{}", method, AUTH_PATH, path);
        self.client
            .request(method, self.auth_url(path))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
    }

    /// Execute request and handle errors. Empty bodies come back as `Value::Null`.
    async fn execute(&self, req: RequestBuilder) -> GatewayErrorResult<Value> {
        let response = req.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        let value = if body.is_empty() {
            Value::Null
        } else {
            match serde_json::from_slice::<Value>(&body) {
                Ok(value) => value,
                Err(_) if !status.is_success() => {
                    Value::String(String::from_utf8_lossy(&body).into_owned())
                }
                Err(e) => return Err(GatewayError::from_json(e)),
            }
        };

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &value));
        }

        Ok(value)
    }

    /// Same as `execute`, with backend rejections reported as auth failures.
    async fn execute_auth(&self, req: RequestBuilder) -> GatewayErrorResult<Value> {
        self.execute(req).await.map_err(|err| match err {
            GatewayError::Api { message, .. } => GatewayError::auth(message),
            other => other,
        })
    }

    // =========================================================================
    // Session bookkeeping
    // =========================================================================

    async fn store_session(&self, session: &Session) {
        *self.session.write().await = Some(session.clone());

        if let Err(e) = self.storage.save(session) {
            warn!("Failed to persist session: {}", e);
        }
    }

    async fn clear_session(&self) {
        *self.session.write().await = None;

        if let Err(e) = self.storage.clear() {
            warn!("Failed to clear persisted session: {}", e);
        }
    }

    async fn exchange_refresh_token(&self, refresh_token: &str) -> GatewayErrorResult<Session> {
        #[derive(Serialize)]
        struct RefreshGrant<'a> {
            refresh_token: &'a str,
        }

        let req = self
            .auth_request(Method::POST, "/token?grant_type=refresh_token")
            .json(&RefreshGrant { refresh_token });
        let value = self.execute_auth(req).await?;
        parse_session(value)
    }
}

#[async_trait]
impl AuthApi for HttpGateway {
    async fn get_persisted_session(&self) -> GatewayErrorResult<Option<Session>> {
        if let Some(session) = self.current_session().await {
            return Ok(Some(session));
        }

        let Some(stored) = self.storage.load()? else {
            return Ok(None);
        };

        if !stored.is_expired_at(Utc::now().timestamp()) {
            *self.session.write().await = Some(stored.clone());
            return Ok(Some(stored));
        }

        info!("Persisted session for {} expired, refreshing", stored.subject_id());
        let Some(refresh_token) = stored.refresh_token.as_deref() else {
            self.storage.clear()?;
            return Ok(None);
        };

        match self.exchange_refresh_token(refresh_token).await {
            Ok(session) => {
                self.store_session(&session).await;
                Ok(Some(session))
            }
            Err(e) => {
                warn!("Could not refresh persisted session: {}", e.user_message());
                self.storage.clear()?;
                Ok(None)
            }
        }
    }

    fn on_session_changed(&self) -> Subscription<SessionEvent> {
        self.auth_events.subscribe()
    }

    async fn sign_in_with_password(
        &self,
        credentials: &Credentials,
    ) -> GatewayErrorResult<Session> {
        #[derive(Serialize)]
        struct PasswordGrant<'a> {
            email: &'a str,
            password: &'a str,
        }

        let body = PasswordGrant {
            email: &credentials.email,
            password: &credentials.password,
        };
        let req = self
            .auth_request(Method::POST, "/token?grant_type=password")
            .json(&body);
        let session = parse_session(self.execute_auth(req).await?)?;

        self.store_session(&session).await;
        info!("Signed in as {}", session.subject_id());
        self.auth_events.publish(SessionEvent::signed_in(session.clone()));

        Ok(session)
    }

    async fn sign_up(
        &self,
        credentials: &Credentials,
        metadata: &SignUpMetadata,
    ) -> GatewayErrorResult<SignUpOutcome> {
        #[derive(Serialize)]
        struct SignUpRequest<'a> {
            email: &'a str,
            password: &'a str,
            data: &'a SignUpMetadata,
        }

        let body = SignUpRequest {
            email: &credentials.email,
            password: &credentials.password,
            data: metadata,
        };
        let req = self.auth_request(Method::POST, "/signup").json(&body);
        let value = self.execute_auth(req).await?;

        // With email confirmation on, the backend returns the bare user
        if value.get("access_token").is_some() {
            let session = parse_session(value)?;
            self.store_session(&session).await;
            info!("Signed up and signed in as {}", session.subject_id());
            self.auth_events.publish(SessionEvent::signed_in(session.clone()));

            Ok(SignUpOutcome {
                identity: session.user.clone(),
                session: Some(session),
            })
        } else {
            let user = value.get("user").cloned().unwrap_or(value);
            let identity: Identity = serde_json::from_value(user)?;
            info!("Signed up {} (confirmation pending)", identity.id);

            Ok(SignUpOutcome {
                identity,
                session: None,
            })
        }
    }

    async fn sign_out(&self) -> GatewayErrorResult<()> {
        if let Some(session) = self.current_session().await {
            let req = self
                .client
                .post(self.auth_url("/logout"))
                .header("apikey", &self.anon_key)
                .bearer_auth(&session.access_token);
            self.execute_auth(req).await?;
        }

        self.clear_session().await;
        info!("Signed out");
        self.auth_events.publish(SessionEvent::signed_out());

        Ok(())
    }

    async fn refresh_session(&self) -> GatewayErrorResult<Session> {
        let refresh_token = self
            .current_session()
            .await
            .and_then(|session| session.refresh_token)
            .ok_or_else(|| GatewayError::auth("No refresh token available"))?;

        let session = self.exchange_refresh_token(&refresh_token).await?;
        self.store_session(&session).await;
        debug!("Refreshed session for {}", session.subject_id());
        self.auth_events
            .publish(SessionEvent::token_refreshed(session.clone()));

        Ok(session)
    }
}

#[async_trait]
impl TableApi for HttpGateway {
    async fn select(&self, query: &Query) -> GatewayErrorResult<Vec<Value>> {
        let url = self.rest_url(query)?;
        let req = self.request(Method::GET, url).await;
        Ok(into_rows(self.execute(req).await?))
    }

    async fn insert(&self, table: &str, rows: Value) -> GatewayErrorResult<Vec<Value>> {
        let url = self.rest_url(&Query::table(table))?;
        let req = self
            .request(Method::POST, url)
            .await
            .header("Prefer", "return=representation")
            .json(&rows);
        let stored = into_rows(self.execute(req).await?);

        self.echo(table, ChangeKind::Insert, &stored);
        Ok(stored)
    }

    async fn update(&self, query: &Query, patch: Value) -> GatewayErrorResult<Vec<Value>> {
        let url = self.rest_url(query)?;
        let req = self
            .request(Method::PATCH, url)
            .await
            .header("Prefer", "return=representation")
            .json(&patch);
        let updated = into_rows(self.execute(req).await?);

        self.echo(query.table_name(), ChangeKind::Update, &updated);
        Ok(updated)
    }

    async fn delete(&self, query: &Query) -> GatewayErrorResult<Vec<Value>> {
        let url = self.rest_url(query)?;
        let req = self
            .request(Method::DELETE, url)
            .await
            .header("Prefer", "return=representation");
        let deleted = into_rows(self.execute(req).await?);

        self.echo(query.table_name(), ChangeKind::Delete, &deleted);
        Ok(deleted)
    }

    fn subscribe(&self, filters: Vec<ChangeFilter>) -> ChangeSubscription {
        ChangeSubscription::new(self.changes.subscribe(), filters)
    }
}

impl HttpGateway {
    fn echo(&self, table: &str, kind: ChangeKind, rows: &[Value]) {
        for row in rows {
            self.changes
                .publish(ChangeEvent::new(table, kind, row.clone()));
        }
    }
}

/// Token endpoint responses carry `expires_in`; derive `expires_at` when absent.
fn parse_session(value: Value) -> GatewayErrorResult<Session> {
    let expires_in = value.get("expires_in").and_then(Value::as_i64);
    let mut session: Session = serde_json::from_value(value)?;

    if session.expires_at.is_none()
        && let Some(expires_in) = expires_in
    {
        session.expires_at = Some(Utc::now().timestamp() + expires_in);
    }

    Ok(session)
}

fn into_rows(value: Value) -> Vec<Value> {
    match value {
        Value::Array(rows) => rows,
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

/// GoTrue reports `error_description` or `msg`, PostgREST `message` and `code`.
fn api_error(status: u16, body: &Value) -> GatewayError {
    let text = |key: &str| body.get(key).and_then(Value::as_str).map(String::from);

    let code = text("code")
        .or_else(|| text("error_code"))
        .or_else(|| text("error"))
        .or_else(|| body.get("code").map(|c| c.to_string()))
        .unwrap_or_else(|| status.to_string());

    let message = text("error_description")
        .or_else(|| text("msg"))
        .or_else(|| text("message"))
        .or_else(|| body.as_str().map(String::from))
        .unwrap_or_else(|| format!("Request failed with status {}", status));

    GatewayError::api(status, code, message)
}
