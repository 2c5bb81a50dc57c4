//! Wire models shared by every `HostedBackend` implementation.
//!
//! These models mirror the JSON shapes of the hosted auth API (users and
//! sessions) so that the application core can work with one consistent set
//! of types regardless of which client produced them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AdapterError;

/// Opaque user identifier issued by the backend's auth subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: Value,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn full_name(&self) -> Option<&str> {
        self.user_metadata.get("full_name").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Unix timestamp (seconds) after which the access token is rejected.
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl Session {
    /// A session reconstructed from an `Authorization` header. Refresh data
    /// is unknown in that case.
    pub fn from_bearer(access_token: impl Into<String>, user: User) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            token_type: default_token_type(),
            expires_at: None,
            user,
        }
    }

    /// A session without a known expiry is never considered expired locally;
    /// the backend remains the judge.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .is_some_and(|expires_at| now.timestamp() >= expires_at)
    }
}

/// Result of a sign-up call. Both halves are optional: with email
/// confirmation enabled the backend returns a user but no session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: Option<User>,
    pub session: Option<Session>,
}

impl AuthResponse {
    /// Normalizes the raw sign-up body, which is either a session (carrying
    /// `access_token`) or a bare user object.
    pub fn from_signup_body(body: Value) -> Result<Self, AdapterError> {
        if body.get("access_token").is_some() {
            let session: Session = serde_json::from_value(body)?;
            return Ok(Self {
                user: Some(session.user.clone()),
                session: Some(session),
            });
        }

        if body.get("id").is_some_and(|id| !id.is_null()) {
            let user: User = serde_json::from_value(body)?;
            return Ok(Self {
                user: Some(user),
                session: None,
            });
        }

        Ok(Self::default())
    }
}

#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    /// Where the confirmation email should send the user.
    pub redirect_to: String,
}

impl fmt::Debug for SignUpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignUpRequest")
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .field("redirect_to", &self.redirect_to)
            .finish_non_exhaustive()
    }
}
