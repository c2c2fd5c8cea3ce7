use crate::tables::{
    COMMENTS, CONVERSATION_PARTICIPANTS, CONVERSATIONS, HEALTH_PROFESSIONALS, MESSAGES,
    POST_LIKES, POSTS, PROFILES,
};
use crate::{
    AuthApi, ChangeEvent, ChangeFilter, ChangeKind, ChangeSubscription, EventBus, FaultOp,
    GatewayCall, GatewayError, Query, Result as GatewayErrorResult, SessionEvent, SignUpOutcome,
    Subscription, TableApi,
};

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use ld_core::{Credentials, Identity, Session, SignUpMetadata};
use log::debug;
use serde_json::{Map, Value, json};
use tokio::sync::Mutex;
use uuid::Uuid;

const EVENT_CAPACITY: usize = 256;
const SESSION_TTL_SECS: i64 = 3600;
const MIN_PASSWORD_LENGTH: usize = 6;

/// Tables whose primary key is a generated `id` column
const ID_TABLES: [&str; 4] = [POSTS, COMMENTS, CONVERSATIONS, MESSAGES];

struct Account {
    identity: Identity,
    password: String,
}

#[derive(Default)]
struct MemoryState {
    tables: HashMap<String, Vec<Value>>,
    /// Keyed by lowercased email
    accounts: HashMap<String, Account>,
    session: Option<Session>,
    calls: Vec<GatewayCall>,
    faults: HashMap<FaultOp, String>,
    token_counter: u64,
    last_timestamp: Option<DateTime<Utc>>,
}

impl MemoryState {
    fn check_fault(&self, op: FaultOp) -> GatewayErrorResult<()> {
        match self.faults.get(&op) {
            Some(message) => Err(GatewayError::injected(message.clone())),
            None => Ok(()),
        }
    }

    /// Strictly increasing timestamps so inserts keep a total order.
    fn next_timestamp(&mut self) -> String {
        let mut now = Utc::now();
        if let Some(last) = self.last_timestamp
            && now <= last
        {
            now = last + Duration::microseconds(1);
        }
        self.last_timestamp = Some(now);
        now.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    fn issue_session(&mut self, identity: &Identity) -> Session {
        self.token_counter += 1;
        let n = self.token_counter;

        let mut session = Session::new(format!("memory-access-{}", n), identity.clone());
        session.refresh_token = Some(format!("memory-refresh-{}", n));
        session.expires_at = Some(Utc::now().timestamp() + SESSION_TTL_SECS);
        session
    }

    fn apply_defaults(&mut self, table: &str, row: &mut Map<String, Value>) {
        if ID_TABLES.contains(&table) && !row.contains_key("id") {
            row.insert(String::from("id"), Value::String(Uuid::new_v4().to_string()));
        }

        let stamp_columns: &[&str] = match table {
            CONVERSATION_PARTICIPANTS => &["joined_at"],
            CONVERSATIONS => &["created_at", "updated_at"],
            _ => &["created_at"],
        };

        for column in stamp_columns {
            if !row.contains_key(*column) {
                let stamp = self.next_timestamp();
                row.insert(column.to_string(), Value::String(stamp));
            }
        }
    }

    /// Emulates the server-side trigger that creates a profile for each new account.
    fn create_profile_row(&mut self, identity: &Identity, metadata: &SignUpMetadata) -> Value {
        let created_at = self.next_timestamp();
        let row = json!({
            "id": identity.id,
            "email": identity.email,
            "full_name": metadata.full_name,
            "avatar_url": null,
            "phone": null,
            "district": null,
            "created_at": created_at,
            "updated_at": null,
        });

        self.tables
            .entry(PROFILES.to_string())
            .or_default()
            .push(row.clone());
        row
    }
}

/// Unique columns per table, checked on insert
fn unique_key(table: &str) -> &'static [&'static str] {
    match table {
        PROFILES => &["id"],
        POST_LIKES => &["post_id", "user_id"],
        CONVERSATION_PARTICIPANTS => &["conversation_id", "user_id"],
        HEALTH_PROFESSIONALS => &["user_id"],
        t if ID_TABLES.contains(&t) => &["id"],
        _ => &[],
    }
}

fn same_key(key: &[&str], a: &Map<String, Value>, b: &Map<String, Value>) -> bool {
    !key.is_empty() && key.iter().all(|column| a.get(*column) == b.get(*column))
}

/// In-process backend for offline previews and tests.
///
/// Tables are plain vectors of JSON rows. Accounts, sessions and the profile
/// trigger behave like the hosted backend. Every call is recorded and any
/// operation can be made to fail with [`MemoryGateway::fail`].
pub struct MemoryGateway {
    state: Mutex<MemoryState>,
    auth_events: EventBus<SessionEvent>,
    changes: EventBus<ChangeEvent>,
    autoconfirm: bool,
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState::default()),
            auth_events: EventBus::new(EVENT_CAPACITY),
            changes: EventBus::new(EVENT_CAPACITY),
            autoconfirm: true,
        }
    }

    /// Sign-up returns no session, as when email confirmation is required.
    pub fn without_autoconfirm() -> Self {
        Self {
            autoconfirm: false,
            ..Self::new()
        }
    }

    // =========================================================================
    // Seeding and inspection
    // =========================================================================

    /// Register an account and its profile row without emitting events.
    pub async fn add_account(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Identity {
        let mut state = self.state.lock().await;
        let identity = Identity::new(Uuid::new_v4().to_string(), Some(email.to_string()));
        let metadata = SignUpMetadata {
            full_name: full_name.map(String::from),
        };

        state.create_profile_row(&identity, &metadata);
        state.accounts.insert(
            email.to_lowercase(),
            Account {
                identity: identity.clone(),
                password: password.to_string(),
            },
        );
        identity
    }

    /// Insert rows directly, filling generated columns but emitting no events.
    pub async fn seed(&self, table: &str, rows: Vec<Value>) {
        let mut state = self.state.lock().await;
        for row in rows {
            let Value::Object(mut row) = row else {
                continue;
            };
            state.apply_defaults(table, &mut row);
            state
                .tables
                .entry(table.to_string())
                .or_default()
                .push(Value::Object(row));
        }
    }

    pub async fn rows(&self, table: &str) -> Vec<Value> {
        let state = self.state.lock().await;
        state.tables.get(table).cloned().unwrap_or_default()
    }

    /// Session the next `get_persisted_session` will return
    pub async fn set_persisted_session(&self, session: Option<Session>) {
        self.state.lock().await.session = session;
    }

    /// Issue a fresh session for a known identity without signing in.
    pub async fn issue_session(&self, identity: &Identity) -> Session {
        self.state.lock().await.issue_session(identity)
    }

    pub async fn current_session(&self) -> Option<Session> {
        self.state.lock().await.session.clone()
    }

    /// Simulate a session change pushed by the backend.
    pub async fn push_session_event(&self, event: SessionEvent) -> usize {
        self.state.lock().await.session = event.session.clone();
        self.auth_events.publish(event)
    }

    /// Simulate a change made by another client.
    pub fn push_change(&self, event: ChangeEvent) -> usize {
        self.changes.publish(event)
    }

    pub async fn calls(&self) -> Vec<GatewayCall> {
        self.state.lock().await.calls.clone()
    }

    pub async fn count_calls(&self, call: &GatewayCall) -> usize {
        let state = self.state.lock().await;
        state.calls.iter().filter(|c| *c == call).count()
    }

    pub async fn auth_call_count(&self) -> usize {
        let state = self.state.lock().await;
        state.calls.iter().filter(|c| c.is_auth()).count()
    }

    pub async fn clear_calls(&self) {
        self.state.lock().await.calls.clear();
    }

    /// Make `op` fail with `message` until cleared.
    pub async fn fail(&self, op: FaultOp, message: impl Into<String>) {
        self.state.lock().await.faults.insert(op, message.into());
    }

    pub async fn clear_fault(&self, op: &FaultOp) {
        self.state.lock().await.faults.remove(op);
    }

    pub async fn clear_faults(&self) {
        self.state.lock().await.faults.clear();
    }

    pub fn session_subscriptions(&self) -> usize {
        self.auth_events.active_subscriptions()
    }

    pub fn change_subscriptions(&self) -> usize {
        self.changes.active_subscriptions()
    }

    fn echo(&self, table: &str, kind: ChangeKind, rows: &[Value]) {
        for row in rows {
            self.changes
                .publish(ChangeEvent::new(table, kind, row.clone()));
        }
    }
}

#[async_trait]
impl AuthApi for MemoryGateway {
    async fn get_persisted_session(&self) -> GatewayErrorResult<Option<Session>> {
        let mut state = self.state.lock().await;
        state.calls.push(GatewayCall::PersistedSession);
        state.check_fault(FaultOp::PersistedSession)?;
        Ok(state.session.clone())
    }

    fn on_session_changed(&self) -> Subscription<SessionEvent> {
        self.auth_events.subscribe()
    }

    async fn sign_in_with_password(
        &self,
        credentials: &Credentials,
    ) -> GatewayErrorResult<Session> {
        let session = {
            let mut state = self.state.lock().await;
            state.calls.push(GatewayCall::SignIn {
                email: credentials.email.clone(),
            });
            state.check_fault(FaultOp::SignIn)?;

            let identity = match state.accounts.get(&credentials.email.to_lowercase()) {
                Some(account) if account.password == credentials.password => {
                    account.identity.clone()
                }
                _ => return Err(GatewayError::auth("Invalid login credentials")),
            };

            let session = state.issue_session(&identity);
            state.session = Some(session.clone());
            session
        };

        debug!("Memory gateway signed in {}", session.subject_id());
        self.auth_events
            .publish(SessionEvent::signed_in(session.clone()));
        Ok(session)
    }

    async fn sign_up(
        &self,
        credentials: &Credentials,
        metadata: &SignUpMetadata,
    ) -> GatewayErrorResult<SignUpOutcome> {
        let (outcome, profile_row) = {
            let mut state = self.state.lock().await;
            state.calls.push(GatewayCall::SignUp {
                email: credentials.email.clone(),
            });
            state.check_fault(FaultOp::SignUp)?;

            let key = credentials.email.to_lowercase();
            if state.accounts.contains_key(&key) {
                return Err(GatewayError::auth("User already registered"));
            }
            if credentials.password.chars().count() < MIN_PASSWORD_LENGTH {
                return Err(GatewayError::auth(
                    "Password should be at least 6 characters",
                ));
            }

            let identity =
                Identity::new(Uuid::new_v4().to_string(), Some(credentials.email.clone()));
            state.accounts.insert(
                key,
                Account {
                    identity: identity.clone(),
                    password: credentials.password.clone(),
                },
            );
            let profile_row = state.create_profile_row(&identity, metadata);

            let session = if self.autoconfirm {
                let session = state.issue_session(&identity);
                state.session = Some(session.clone());
                Some(session)
            } else {
                None
            };

            (SignUpOutcome { identity, session }, profile_row)
        };

        self.echo(PROFILES, ChangeKind::Insert, &[profile_row]);
        if let Some(ref session) = outcome.session {
            self.auth_events
                .publish(SessionEvent::signed_in(session.clone()));
        }
        Ok(outcome)
    }

    async fn sign_out(&self) -> GatewayErrorResult<()> {
        {
            let mut state = self.state.lock().await;
            state.calls.push(GatewayCall::SignOut);
            state.check_fault(FaultOp::SignOut)?;
            state.session = None;
        }

        self.auth_events.publish(SessionEvent::signed_out());
        Ok(())
    }

    async fn refresh_session(&self) -> GatewayErrorResult<Session> {
        let session = {
            let mut state = self.state.lock().await;
            state.calls.push(GatewayCall::Refresh);
            state.check_fault(FaultOp::Refresh)?;

            let identity = match state.session {
                Some(ref session) => session.user.clone(),
                None => return Err(GatewayError::auth("No refresh token available")),
            };
            let session = state.issue_session(&identity);
            state.session = Some(session.clone());
            session
        };

        self.auth_events
            .publish(SessionEvent::token_refreshed(session.clone()));
        Ok(session)
    }
}

#[async_trait]
impl TableApi for MemoryGateway {
    async fn select(&self, query: &Query) -> GatewayErrorResult<Vec<Value>> {
        let mut state = self.state.lock().await;
        let table = query.table_name();
        state.calls.push(GatewayCall::select(table));
        state.check_fault(FaultOp::Select(table.to_string()))?;

        Ok(state
            .tables
            .get(table)
            .map(|rows| query.apply(rows))
            .unwrap_or_default())
    }

    async fn insert(&self, table: &str, rows: Value) -> GatewayErrorResult<Vec<Value>> {
        let stored = {
            let mut state = self.state.lock().await;
            state.calls.push(GatewayCall::insert(table));
            state.check_fault(FaultOp::Insert(table.to_string()))?;

            let candidates = match rows {
                Value::Object(row) => vec![row],
                Value::Array(rows) => rows
                    .into_iter()
                    .map(|row| match row {
                        Value::Object(row) => Ok(row),
                        _ => Err(GatewayError::api(400, "PGRST102", "Expected JSON objects")),
                    })
                    .collect::<GatewayErrorResult<Vec<_>>>()?,
                _ => return Err(GatewayError::api(400, "PGRST102", "Expected JSON objects")),
            };

            let mut prepared: Vec<Map<String, Value>> = Vec::with_capacity(candidates.len());
            for mut row in candidates {
                state.apply_defaults(table, &mut row);

                let key = unique_key(table);
                let existing = state.tables.get(table).map(Vec::as_slice).unwrap_or_default();
                let clashes = existing
                    .iter()
                    .filter_map(Value::as_object)
                    .chain(prepared.iter())
                    .any(|other| same_key(key, &row, other));
                if clashes {
                    return Err(GatewayError::api(
                        409,
                        "23505",
                        format!("duplicate key value violates unique constraint on {}", table),
                    ));
                }
                prepared.push(row);
            }

            let stored: Vec<Value> = prepared.into_iter().map(Value::Object).collect();
            state
                .tables
                .entry(table.to_string())
                .or_default()
                .extend(stored.iter().cloned());
            stored
        };

        self.echo(table, ChangeKind::Insert, &stored);
        Ok(stored)
    }

    async fn update(&self, query: &Query, patch: Value) -> GatewayErrorResult<Vec<Value>> {
        let table = query.table_name();
        let updated = {
            let mut state = self.state.lock().await;
            state.calls.push(GatewayCall::update(table));
            state.check_fault(FaultOp::Update(table.to_string()))?;

            let Value::Object(patch) = patch else {
                return Err(GatewayError::api(400, "PGRST102", "Expected a JSON object"));
            };

            let mut updated = Vec::new();
            if let Some(rows) = state.tables.get_mut(table) {
                for row in rows.iter_mut().filter(|row| query.matches(row)) {
                    if let Value::Object(fields) = row {
                        for (column, value) in &patch {
                            fields.insert(column.clone(), value.clone());
                        }
                    }
                    updated.push(row.clone());
                }
            }
            updated
        };

        self.echo(table, ChangeKind::Update, &updated);
        Ok(updated)
    }

    async fn delete(&self, query: &Query) -> GatewayErrorResult<Vec<Value>> {
        let table = query.table_name();
        let deleted = {
            let mut state = self.state.lock().await;
            state.calls.push(GatewayCall::Delete {
                table: table.to_string(),
            });
            state.check_fault(FaultOp::Delete(table.to_string()))?;

            let mut deleted = Vec::new();
            if let Some(rows) = state.tables.get_mut(table) {
                rows.retain(|row| {
                    if query.matches(row) {
                        deleted.push(row.clone());
                        false
                    } else {
                        true
                    }
                });
            }
            deleted
        };

        self.echo(table, ChangeKind::Delete, &deleted);
        Ok(deleted)
    }

    fn subscribe(&self, filters: Vec<ChangeFilter>) -> ChangeSubscription {
        ChangeSubscription::new(self.changes.subscribe(), filters)
    }
}
