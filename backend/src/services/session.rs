//! The authenticated session and the state derived from it.
//!
//! `SessionStore` is the one place the current session lives. Readers get
//! the whole `AuthState` snapshot; writers replace it wholesale. Token
//! refresh goes through `SessionStore::refresh` only.

use std::sync::Arc;

use adapters::{HostedBackend, Session};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info};

use crate::auth::errors::AuthError;
use crate::database::models::Profile;
use crate::services::{profile, roles};

/// Session plus what bootstrap and role resolution derived from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthState {
    pub session: Session,
    pub profile: Option<Profile>,
    pub is_admin: bool,
}

impl AuthState {
    /// State for a session whose profile and role have not been resolved.
    pub fn unresolved(session: Session) -> Self {
        Self {
            session,
            profile: None,
            is_admin: false,
        }
    }
}

#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Option<Arc<AuthState>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with `session`, derived state left unresolved.
    pub fn with_session(session: Session) -> Self {
        let store = Self::new();
        store.replace(AuthState::unresolved(session));
        store
    }

    pub fn current(&self) -> Option<Arc<AuthState>> {
        self.inner.read().clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.current().map(|state| state.session.access_token.clone())
    }

    pub fn replace(&self, state: AuthState) -> Arc<AuthState> {
        let state = Arc::new(state);
        *self.inner.write() = Some(state.clone());
        state
    }

    pub fn clear(&self) {
        *self.inner.write() = None;
    }

    /// Resolves profile and admin role for `session`, one after the other,
    /// and stores the result. A profile fetch failure leaves the store
    /// untouched.
    pub async fn establish(
        &self,
        backend: &dyn HostedBackend,
        session: Session,
    ) -> Result<Arc<AuthState>, AuthError> {
        let user_id = session.user.id.clone();

        let profile = profile::fetch_or_create_profile(backend, Some(&session), &user_id).await?;
        let is_admin = roles::is_user_admin(backend, Some(&session), &user_id).await;

        info!(%user_id, is_admin, "session established");
        Ok(self.replace(AuthState {
            session,
            profile,
            is_admin,
        }))
    }

    /// Exchanges the stored refresh token for a new session and re-derives
    /// the state from it.
    pub async fn refresh(&self, backend: &dyn HostedBackend) -> Result<Arc<AuthState>, AuthError> {
        let refresh_token = self
            .current()
            .and_then(|state| state.session.refresh_token.clone())
            .ok_or(AuthError::NotSignedIn)?;

        self.refresh_with(backend, &refresh_token).await
    }

    /// Like `refresh`, but with a refresh token the caller kept, for
    /// resuming a session this store has not seen yet.
    pub async fn refresh_with(
        &self,
        backend: &dyn HostedBackend,
        refresh_token: &str,
    ) -> Result<Arc<AuthState>, AuthError> {
        debug!("refreshing session");
        let session = backend.refresh_session(refresh_token).await?;
        self.establish(backend, session).await
    }
}
