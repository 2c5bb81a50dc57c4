//! Data structures for authentication-related entities.
//!
//! This module defines the UI effects the auth flows produce (notifications
//! and navigation), the `{data, error}` result shape, and the request forms
//! accepted by the HTTP handlers.

use std::fmt;

use adapters::{Session, User};
use serde::{Deserialize, Serialize};

use super::errors::AuthError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A short-lived message for the user (a toast).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn success(title: &str, description: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            title: title.to_string(),
            description: description.into(),
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: "Error".to_string(),
            description: description.into(),
        }
    }
}

/// Front-end routes the flows navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    ResetPassword,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Dashboard => "/dashboard",
            Route::ResetPassword => "/reset-password",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl Serialize for Route {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.path())
    }
}

/// Something the caller should do in the UI once an operation resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    Notify(Notification),
    Navigate { to: Route },
}

/// `{data, error}` pair: exactly one side is set.
#[derive(Debug)]
pub struct DataResult<T> {
    pub data: Option<T>,
    pub error: Option<AuthError>,
}

impl<T> DataResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: AuthError) -> Self {
        Self {
            data: None,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

impl<T> From<Result<T, AuthError>> for DataResult<T> {
    fn from(result: Result<T, AuthError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(error) => Self::err(error),
        }
    }
}

/// What a successful sign-up hands back. `session` is absent while the
/// email address awaits confirmation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignUpData {
    pub user: User,
    pub session: Option<Session>,
}

#[derive(Clone, Deserialize)]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

#[derive(Clone, Deserialize)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResetPasswordForm {
    pub email: String,
}

#[derive(Clone, Deserialize)]
pub struct UpdatePasswordForm {
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn effects_serialize_for_the_front_end() {
        let effects = vec![
            Effect::Navigate { to: Route::Login },
            Effect::Notify(Notification::success("Signed out", "Bye")),
        ];

        assert_eq!(
            serde_json::to_value(effects).unwrap(),
            json!([
                { "type": "navigate", "to": "/login" },
                { "type": "notify", "level": "success", "title": "Signed out", "description": "Bye" }
            ])
        );
    }

    #[test]
    fn data_result_from_result() {
        let ok: DataResult<u8> = Ok(1).into();
        assert!(ok.is_ok());
        assert_eq!(ok.data, Some(1));

        let err: DataResult<u8> = Err(AuthError::NotSignedIn).into();
        assert!(!err.is_ok());
        assert!(err.data.is_none());
    }
}
