//! UI effects for the auth operations.
//!
//! `AuthFlow` runs an `AuthService` operation and, once it resolved, hands
//! the resulting notifications and navigation to an `EffectHandler`. Which
//! failures are returned, re-raised, or absorbed is decided here, per
//! operation.

use std::sync::Arc;

use adapters::User;
use parking_lot::Mutex;

use super::errors::AuthError;
use super::models::{DataResult, Effect, Notification, Route, SignUpData};
use super::service::AuthService;
use crate::services::session::{AuthState, SessionStore};

const RESET_SENT: (&str, &str) = (
    "Password reset email sent",
    "Check your email for a link to reset your password.",
);
const RESET_FAILED: &str = "Failed to send password reset email";

const PASSWORD_UPDATED: (&str, &str) = (
    "Password updated",
    "Your password has been updated successfully.",
);
const UPDATE_FAILED: &str = "Failed to update password";

const ACCOUNT_CREATED: (&str, &str) = (
    "Account created",
    "Please check your email to confirm your account.",
);
const SIGN_UP_FAILED: &str = "Failed to create account";

const SIGNED_IN: &str = "Welcome back";
const SIGN_IN_FAILED: &str = "Failed to sign in";

const SIGNED_OUT: (&str, &str) = ("Signed out", "You have been signed out successfully.");
const SIGN_OUT_FAILED: &str = "Failed to sign out";

/// Caller-side sink for UI effects.
pub trait EffectHandler: Send + Sync {
    fn handle(&self, effect: Effect);
}

/// Collects effects in order, for handing to a client or asserting on.
#[derive(Default)]
pub struct EffectLog {
    effects: Mutex<Vec<Effect>>,
}

impl EffectLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn effects(&self) -> Vec<Effect> {
        self.effects.lock().clone()
    }

    pub fn into_effects(self) -> Vec<Effect> {
        self.effects.into_inner()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.effects
            .lock()
            .iter()
            .filter_map(|effect| match effect {
                Effect::Notify(n) => Some(n.clone()),
                Effect::Navigate { .. } => None,
            })
            .collect()
    }

    pub fn navigations(&self) -> Vec<Route> {
        self.effects
            .lock()
            .iter()
            .filter_map(|effect| match effect {
                Effect::Navigate { to } => Some(*to),
                Effect::Notify(_) => None,
            })
            .collect()
    }
}

impl EffectHandler for EffectLog {
    fn handle(&self, effect: Effect) {
        self.effects.lock().push(effect);
    }
}

pub struct AuthFlow<'a> {
    service: &'a AuthService,
    effects: &'a dyn EffectHandler,
}

impl<'a> AuthFlow<'a> {
    pub fn new(service: &'a AuthService, effects: &'a dyn EffectHandler) -> Self {
        Self { service, effects }
    }

    fn notify(&self, notification: Notification) {
        self.effects.handle(Effect::Notify(notification));
    }

    fn navigate(&self, to: Route) {
        self.effects.handle(Effect::Navigate { to });
    }

    fn notify_failure(&self, err: &AuthError, fallback: &str) {
        self.notify(Notification::error(err.user_message(fallback)));
    }

    pub async fn reset_password(&self, email: &str) -> DataResult<()> {
        match self.service.reset_password(email).await {
            Ok(()) => {
                self.notify(Notification::success(RESET_SENT.0, RESET_SENT.1));
                DataResult::ok(())
            }
            Err(err) => {
                self.notify_failure(&err, RESET_FAILED);
                DataResult::err(err)
            }
        }
    }

    pub async fn update_password(&self, store: &SessionStore, new_password: &str) -> DataResult<User> {
        match self.service.update_password(store, new_password).await {
            Ok(user) => {
                self.notify(Notification::success(PASSWORD_UPDATED.0, PASSWORD_UPDATED.1));
                self.navigate(Route::Dashboard);
                DataResult::ok(user)
            }
            Err(err) => {
                self.notify_failure(&err, UPDATE_FAILED);
                DataResult::err(err)
            }
        }
    }

    /// Unlike the other operations, failures are raised to the caller after
    /// the notification.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<SignUpData, AuthError> {
        match self.service.sign_up(email, password, full_name).await {
            Ok(data) => {
                self.notify(Notification::success(ACCOUNT_CREATED.0, ACCOUNT_CREATED.1));
                Ok(data)
            }
            Err(err) => {
                self.notify_failure(&err, SIGN_UP_FAILED);
                Err(err)
            }
        }
    }

    pub async fn sign_in(
        &self,
        store: &SessionStore,
        email: &str,
        password: &str,
    ) -> DataResult<Arc<AuthState>> {
        match self.service.sign_in(store, email, password).await {
            Ok(state) => {
                let greeting = state
                    .profile
                    .as_ref()
                    .and_then(|p| p.full_name.clone())
                    .or_else(|| state.session.user.full_name().map(str::to_string))
                    .map(|name| format!("Signed in as {name}."))
                    .unwrap_or_else(|| "You are now signed in.".to_string());
                self.notify(Notification::success(SIGNED_IN, greeting));
                self.navigate(Route::Dashboard);
                DataResult::ok(state)
            }
            Err(err) => {
                self.notify_failure(&err, SIGN_IN_FAILED);
                DataResult::err(err)
            }
        }
    }

    /// Failures end at the notification; nothing is returned.
    pub async fn sign_out(&self, store: &SessionStore) {
        match self.service.sign_out(store).await {
            Ok(()) => {
                self.navigate(Route::Login);
                self.notify(Notification::success(SIGNED_OUT.0, SIGNED_OUT.1));
            }
            Err(err) => self.notify_failure(&err, SIGN_OUT_FAILED),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adapters::testing::{fixtures, MockBackend};
    use adapters::{AdapterError, AuthResponse};

    use crate::auth::models::NotificationLevel;
    use crate::auth::service::Redirects;

    fn service(backend: MockBackend) -> AuthService {
        AuthService::new(Arc::new(backend), Redirects::new("http://localhost:5173"))
    }

    fn api_error(message: &str) -> AdapterError {
        AdapterError::Api {
            status: 400,
            code: None,
            message: message.to_string(),
        }
    }

    fn signed_in_store() -> (SessionStore, adapters::Session) {
        let session = fixtures::session(fixtures::user("u1", "user@example.com"));
        (SessionStore::with_session(session.clone()), session)
    }

    #[tokio::test]
    async fn reset_password_success_notifies_once() {
        let service = service(MockBackend::new());
        let log = EffectLog::new();

        let result = AuthFlow::new(&service, &log)
            .reset_password("user@example.com")
            .await;

        assert!(result.is_ok());
        assert_eq!(result.data, Some(()));
        assert_eq!(
            log.effects(),
            vec![Effect::Notify(Notification::success(RESET_SENT.0, RESET_SENT.1))]
        );
    }

    #[tokio::test]
    async fn reset_password_failure_carries_backend_message() {
        let service = service(MockBackend::new().fail_reset(api_error("User not found")));
        let log = EffectLog::new();

        let result = AuthFlow::new(&service, &log)
            .reset_password("user@example.com")
            .await;

        assert!(result.data.is_none());
        assert!(matches!(result.error, Some(AuthError::Backend(_))));
        assert_eq!(log.effects(), vec![Effect::Notify(Notification::error("User not found"))]);
    }

    #[tokio::test]
    async fn reset_password_transport_failure_uses_fallback() {
        let service = service(MockBackend::new().fail_reset(AdapterError::Transport("offline".into())));
        let log = EffectLog::new();

        AuthFlow::new(&service, &log).reset_password("user@example.com").await;

        assert_eq!(log.notifications(), vec![Notification::error(RESET_FAILED)]);
    }

    #[tokio::test]
    async fn update_password_success_navigates_to_dashboard_once() {
        let (store, session) = signed_in_store();
        let service = service(MockBackend::new().with_token(&session));
        let log = EffectLog::new();

        let result = AuthFlow::new(&service, &log)
            .update_password(&store, "new-secret")
            .await;

        assert!(result.is_ok());
        assert_eq!(log.navigations(), vec![Route::Dashboard]);
        assert_eq!(
            log.effects(),
            vec![
                Effect::Notify(Notification::success(PASSWORD_UPDATED.0, PASSWORD_UPDATED.1)),
                Effect::Navigate { to: Route::Dashboard },
            ]
        );
    }

    #[tokio::test]
    async fn update_password_failure_does_not_navigate() {
        let (store, _) = signed_in_store();
        let service = service(
            MockBackend::new().fail_update(api_error("New password should be different from the old password.")),
        );
        let log = EffectLog::new();

        let result = AuthFlow::new(&service, &log)
            .update_password(&store, "same-secret")
            .await;

        assert!(!result.is_ok());
        assert!(log.navigations().is_empty());
        assert_eq!(
            log.notifications(),
            vec![Notification::error("New password should be different from the old password.")]
        );
    }

    #[tokio::test]
    async fn sign_up_success_returns_user_and_session() {
        let session = fixtures::session(fixtures::user("u1", "user@example.com"));
        let service = service(MockBackend::new().with_sign_up(Ok(AuthResponse {
            user: Some(session.user.clone()),
            session: Some(session.clone()),
        })));
        let log = EffectLog::new();

        let data = AuthFlow::new(&service, &log)
            .sign_up("user@example.com", "secret1", "Test User")
            .await
            .unwrap();

        assert_eq!(data.session, Some(session));
        assert_eq!(log.notifications().len(), 1);
        assert_eq!(log.notifications()[0].level, NotificationLevel::Success);
    }

    #[tokio::test]
    async fn sign_up_without_user_raises_and_notifies() {
        let service = service(MockBackend::new().with_sign_up(Ok(AuthResponse::default())));
        let log = EffectLog::new();

        let err = AuthFlow::new(&service, &log)
            .sign_up("user@example.com", "secret1", "Test User")
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::MissingUser));
        assert_eq!(
            log.notifications(),
            vec![Notification::error("No user data returned from sign up")]
        );
    }

    #[tokio::test]
    async fn sign_up_backend_failure_is_raised() {
        let service = service(MockBackend::new().with_sign_up(Err(api_error("User already registered"))));
        let log = EffectLog::new();

        let err = AuthFlow::new(&service, &log)
            .sign_up("user@example.com", "secret1", "Test User")
            .await
            .unwrap_err();

        assert_eq!(err.user_message(SIGN_UP_FAILED), "User already registered");
        assert_eq!(log.notifications(), vec![Notification::error("User already registered")]);
    }

    #[tokio::test]
    async fn sign_out_success_navigates_to_login_then_notifies() {
        let (store, _) = signed_in_store();
        let service = service(MockBackend::new());
        let log = EffectLog::new();

        AuthFlow::new(&service, &log).sign_out(&store).await;

        assert_eq!(
            log.effects(),
            vec![
                Effect::Navigate { to: Route::Login },
                Effect::Notify(Notification::success(SIGNED_OUT.0, SIGNED_OUT.1)),
            ]
        );
        assert!(store.current().is_none());
    }

    #[tokio::test]
    async fn sign_out_failure_only_notifies() {
        let (store, _) = signed_in_store();
        let service = service(MockBackend::new().fail_sign_out(api_error("Session not found")));
        let log = EffectLog::new();

        AuthFlow::new(&service, &log).sign_out(&store).await;

        assert!(log.navigations().is_empty());
        assert_eq!(log.notifications(), vec![Notification::error("Session not found")]);
    }

    #[tokio::test]
    async fn sign_in_greets_by_name_and_navigates() {
        let session = fixtures::session(fixtures::user("u1", "user@example.com"));
        let service = service(MockBackend::new().with_session(session));
        let log = EffectLog::new();
        let store = SessionStore::new();

        let result = AuthFlow::new(&service, &log)
            .sign_in(&store, "user@example.com", "secret1")
            .await;

        assert!(result.is_ok());
        assert_eq!(
            log.notifications(),
            vec![Notification::success(SIGNED_IN, "Signed in as Test User.")]
        );
        assert_eq!(log.navigations(), vec![Route::Dashboard]);
    }

    #[tokio::test]
    async fn sign_in_failure_keeps_store_empty() {
        let service = service(MockBackend::new().fail_sign_in(api_error("Invalid login credentials")));
        let log = EffectLog::new();
        let store = SessionStore::new();

        let result = AuthFlow::new(&service, &log)
            .sign_in(&store, "user@example.com", "wrong")
            .await;

        assert!(!result.is_ok());
        assert!(store.current().is_none());
        assert_eq!(log.notifications(), vec![Notification::error("Invalid login credentials")]);
    }
}
