//! Core business logic for the authentication system.
//!
//! This service performs the auth operations against the hosted backend and
//! keeps the `SessionStore` in step with them. It produces plain results and
//! never touches the UI; notifications and navigation are layered on top by
//! `auth::effects`.

use std::sync::Arc;

use adapters::{Credentials, HostedBackend, SignUpRequest, User};
use tracing::{debug, info};

use super::errors::AuthError;
use super::models::{Route, SignUpData};
use crate::services::session::{AuthState, SessionStore};

/// Builds the absolute links the backend puts into auth emails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirects {
    origin: String,
}

impl Redirects {
    /// `origin` is the front-end's `scheme://host[:port]`.
    pub fn new(origin: impl Into<String>) -> Self {
        let origin: String = origin.into();
        Self {
            origin: origin.trim_end_matches('/').to_string(),
        }
    }

    pub fn to(&self, route: Route) -> String {
        format!("{}{}", self.origin, route.path())
    }

    pub fn reset_password(&self) -> String {
        self.to(Route::ResetPassword)
    }

    pub fn login(&self) -> String {
        self.to(Route::Login)
    }
}

#[derive(Clone)]
pub struct AuthService {
    backend: Arc<dyn HostedBackend>,
    redirects: Redirects,
}

impl AuthService {
    pub fn new(backend: Arc<dyn HostedBackend>, redirects: Redirects) -> Self {
        Self { backend, redirects }
    }

    pub fn backend(&self) -> &dyn HostedBackend {
        self.backend.as_ref()
    }

    /// Requests a password-reset email linking back to `/reset-password`.
    pub async fn reset_password(&self, email: &str) -> Result<(), AuthError> {
        self.backend
            .reset_password_for_email(email, &self.redirects.reset_password())
            .await?;

        info!(%email, "password reset email requested");
        Ok(())
    }

    /// Changes the signed-in user's password. The stored session is replaced
    /// with one carrying the updated user.
    pub async fn update_password(
        &self,
        store: &SessionStore,
        new_password: &str,
    ) -> Result<User, AuthError> {
        let current = store.current().ok_or(AuthError::NotSignedIn)?;

        let user = self
            .backend
            .update_password(&current.session.access_token, new_password)
            .await?;

        let mut next = AuthState::clone(&current);
        next.session.user = user.clone();
        store.replace(next);

        info!(user_id = %user.id, "password updated");
        Ok(user)
    }

    /// Creates an account with `full_name` stored in the user metadata. A
    /// success response without a user is treated as a failure.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<SignUpData, AuthError> {
        let request = SignUpRequest {
            email: email.to_string(),
            password: password.to_string(),
            full_name: full_name.to_string(),
            redirect_to: self.redirects.login(),
        };

        let response = self.backend.sign_up(&request).await?;
        let user = response.user.ok_or(AuthError::MissingUser)?;

        info!(user_id = %user.id, confirmed = response.session.is_some(), "account created");
        Ok(SignUpData {
            user,
            session: response.session,
        })
    }

    /// Signs in and resolves the derived state (profile, admin role) into
    /// `store`.
    pub async fn sign_in(
        &self,
        store: &SessionStore,
        email: &str,
        password: &str,
    ) -> Result<Arc<AuthState>, AuthError> {
        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };

        let session = self.backend.sign_in_with_password(&credentials).await?;
        store.establish(self.backend.as_ref(), session).await
    }

    /// Invalidates the current session on the backend, then clears `store`.
    /// With nothing stored there is nothing to invalidate.
    pub async fn sign_out(&self, store: &SessionStore) -> Result<(), AuthError> {
        let Some(access_token) = store.access_token() else {
            debug!("sign out without a session");
            return Ok(());
        };

        self.backend.sign_out(&access_token).await?;
        store.clear();

        info!("signed out");
        Ok(())
    }

    pub async fn refresh(&self, store: &SessionStore) -> Result<Arc<AuthState>, AuthError> {
        store.refresh(self.backend.as_ref()).await
    }

    /// Restores a session from a refresh token held by the client.
    pub async fn resume(
        &self,
        store: &SessionStore,
        refresh_token: &str,
    ) -> Result<Arc<AuthState>, AuthError> {
        store.refresh_with(self.backend.as_ref(), refresh_token).await
    }
}
