//! In-memory test double for `HostedBackend`.
//!
//! `MockBackend` answers from scripted results and a small table store, and
//! records every call so tests can assert on exactly which requests were
//! issued (or that none were).
//!
//! ```
//! use adapters::testing::{Call, MockBackend};
//! use adapters::HostedBackend;
//! use serde_json::json;
//!
//! # tokio_test_block_on(async {
//! let backend = MockBackend::new().with_rpc("is_admin", Ok(json!(true)));
//! let value = backend.rpc(None, "is_admin", json!({"user_id": "u1"})).await.unwrap();
//! assert_eq!(value, json!(true));
//! assert_eq!(backend.call_count(|c| matches!(c, Call::Rpc { .. })), 1);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::errors::AdapterError;
use crate::models::{AuthResponse, Credentials, Session, SignUpRequest, User};
use crate::HostedBackend;

/// A request observed by the mock. Secrets are not recorded.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SignUp { email: String, full_name: String, redirect_to: String },
    SignIn { email: String },
    RefreshSession,
    GetUser,
    SignOut,
    ResetPassword { email: String, redirect_to: String },
    UpdatePassword,
    SelectOne { table: String, column: String, value: String },
    Insert { table: String, row: Value },
    Rpc { function: String, args: Value },
}

#[derive(Default)]
struct MockState {
    calls: Vec<Call>,
    sign_up: Option<Result<AuthResponse, AdapterError>>,
    sign_in: Option<Result<Session, AdapterError>>,
    refresh: Option<Result<Session, AdapterError>>,
    users_by_token: HashMap<String, User>,
    sign_out_error: Option<AdapterError>,
    reset_error: Option<AdapterError>,
    update_error: Option<AdapterError>,
    tables: HashMap<String, Vec<Value>>,
    select_error: Option<AdapterError>,
    insert_error: Option<AdapterError>,
    rpc: HashMap<String, Result<Value, AdapterError>>,
}

#[derive(Default)]
pub struct MockBackend {
    state: Mutex<MockState>,
}

fn unscripted(what: &str) -> AdapterError {
    AdapterError::Api {
        status: 500,
        code: None,
        message: format!("no scripted response for {what}"),
    }
}

fn invalid_token() -> AdapterError {
    AdapterError::Api {
        status: 401,
        code: Some("bad_jwt".to_string()),
        message: "invalid JWT: unable to parse or verify signature".to_string(),
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sign_up(self, result: Result<AuthResponse, AdapterError>) -> Self {
        self.state.lock().sign_up = Some(result);
        self
    }

    /// Scripts a successful sign-in and makes the session's token resolvable
    /// through `get_user`.
    pub fn with_session(self, session: Session) -> Self {
        self.register_token(&session);
        self.state.lock().sign_in = Some(Ok(session));
        self
    }

    pub fn fail_sign_in(self, err: AdapterError) -> Self {
        self.state.lock().sign_in = Some(Err(err));
        self
    }

    pub fn with_refresh(self, result: Result<Session, AdapterError>) -> Self {
        if let Ok(session) = &result {
            self.register_token(session);
        }
        self.state.lock().refresh = Some(result);
        self
    }

    /// Makes `session.access_token` a valid bearer token for `session.user`.
    pub fn with_token(self, session: &Session) -> Self {
        self.register_token(session);
        self
    }

    pub fn fail_sign_out(self, err: AdapterError) -> Self {
        self.state.lock().sign_out_error = Some(err);
        self
    }

    pub fn fail_reset(self, err: AdapterError) -> Self {
        self.state.lock().reset_error = Some(err);
        self
    }

    pub fn fail_update(self, err: AdapterError) -> Self {
        self.state.lock().update_error = Some(err);
        self
    }

    pub fn with_row(self, table: &str, row: Value) -> Self {
        self.state
            .lock()
            .tables
            .entry(table.to_string())
            .or_default()
            .push(row);
        self
    }

    pub fn fail_select(self, err: AdapterError) -> Self {
        self.state.lock().select_error = Some(err);
        self
    }

    pub fn fail_insert(self, err: AdapterError) -> Self {
        self.state.lock().insert_error = Some(err);
        self
    }

    pub fn with_rpc(self, function: &str, result: Result<Value, AdapterError>) -> Self {
        self.state.lock().rpc.insert(function.to_string(), result);
        self
    }

    fn register_token(&self, session: &Session) {
        self.state
            .lock()
            .users_by_token
            .insert(session.access_token.clone(), session.user.clone());
    }

    fn record(&self, call: Call) {
        self.state.lock().calls.push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn call_count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.state.lock().calls.iter().filter(|c| predicate(c)).count()
    }

    /// Rows inserted into `table` during the test, in order.
    pub fn inserts(&self, table: &str) -> Vec<Value> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Insert { table: t, row } if t == table => Some(row.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.state
            .lock()
            .tables
            .get(table)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl HostedBackend for MockBackend {
    async fn sign_up(&self, request: &SignUpRequest) -> Result<AuthResponse, AdapterError> {
        self.record(Call::SignUp {
            email: request.email.clone(),
            full_name: request.full_name.clone(),
            redirect_to: request.redirect_to.clone(),
        });
        self.state
            .lock()
            .sign_up
            .clone()
            .unwrap_or_else(|| Err(unscripted("sign_up")))
    }

    async fn sign_in_with_password(
        &self,
        credentials: &Credentials,
    ) -> Result<Session, AdapterError> {
        self.record(Call::SignIn {
            email: credentials.email.clone(),
        });
        self.state
            .lock()
            .sign_in
            .clone()
            .unwrap_or_else(|| Err(unscripted("sign_in_with_password")))
    }

    async fn refresh_session(&self, _refresh_token: &str) -> Result<Session, AdapterError> {
        self.record(Call::RefreshSession);
        self.state
            .lock()
            .refresh
            .clone()
            .unwrap_or_else(|| Err(unscripted("refresh_session")))
    }

    async fn get_user(&self, access_token: &str) -> Result<User, AdapterError> {
        self.record(Call::GetUser);
        self.state
            .lock()
            .users_by_token
            .get(access_token)
            .cloned()
            .ok_or_else(invalid_token)
    }

    async fn sign_out(&self, _access_token: &str) -> Result<(), AdapterError> {
        self.record(Call::SignOut);
        match self.state.lock().sign_out_error.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn reset_password_for_email(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> Result<(), AdapterError> {
        self.record(Call::ResetPassword {
            email: email.to_string(),
            redirect_to: redirect_to.to_string(),
        });
        match self.state.lock().reset_error.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn update_password(
        &self,
        access_token: &str,
        _password: &str,
    ) -> Result<User, AdapterError> {
        self.record(Call::UpdatePassword);
        let state = self.state.lock();
        if let Some(err) = state.update_error.clone() {
            return Err(err);
        }
        state
            .users_by_token
            .get(access_token)
            .cloned()
            .ok_or_else(invalid_token)
    }

    async fn select_one(
        &self,
        _access_token: Option<&str>,
        table: &str,
        column: &str,
        value: &str,
    ) -> Result<Value, AdapterError> {
        self.record(Call::SelectOne {
            table: table.to_string(),
            column: column.to_string(),
            value: value.to_string(),
        });
        let state = self.state.lock();
        if let Some(err) = state.select_error.clone() {
            return Err(err);
        }
        state
            .tables
            .get(table)
            .and_then(|rows| {
                rows.iter()
                    .find(|row| row.get(column).and_then(Value::as_str) == Some(value))
            })
            .cloned()
            .ok_or(AdapterError::NotFound)
    }

    async fn insert(
        &self,
        _access_token: Option<&str>,
        table: &str,
        row: Value,
    ) -> Result<Value, AdapterError> {
        self.record(Call::Insert {
            table: table.to_string(),
            row: row.clone(),
        });
        let mut state = self.state.lock();
        if let Some(err) = state.insert_error.clone() {
            return Err(err);
        }
        state
            .tables
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        Ok(row)
    }

    async fn rpc(
        &self,
        _access_token: Option<&str>,
        function: &str,
        args: Value,
    ) -> Result<Value, AdapterError> {
        self.record(Call::Rpc {
            function: function.to_string(),
            args,
        });
        self.state
            .lock()
            .rpc
            .get(function)
            .cloned()
            .unwrap_or_else(|| {
                Err(AdapterError::Api {
                    status: 404,
                    code: Some("PGRST202".to_string()),
                    message: format!("Could not find the function public.{function}"),
                })
            })
    }
}

/// Ready-made users and sessions.
pub mod fixtures {
    use serde_json::json;

    use crate::models::{Session, User, UserId};

    pub fn user(id: &str, email: &str) -> User {
        User {
            id: UserId::new(id),
            email: Some(email.to_string()),
            user_metadata: json!({ "full_name": "Test User" }),
            created_at: None,
        }
    }

    pub fn session(user: User) -> Session {
        Session {
            access_token: format!("access-{}", user.id),
            refresh_token: Some(format!("refresh-{}", user.id)),
            token_type: "bearer".to_string(),
            expires_at: Some(4_102_444_800),
            user,
        }
    }
}
