//! Custom error types specific to authentication failures.
//!
//! This module defines the errors that can occur during the authentication
//! flows and how each one is worded when shown to the user.

use adapters::AdapterError;
use thiserror::Error;

use crate::services::profile::ProfileError;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error(transparent)]
    Backend(#[from] AdapterError),

    /// The backend reported success for a sign-up but returned no user.
    #[error("No user data returned from sign up")]
    MissingUser,

    #[error("You are not signed in")]
    NotSignedIn,

    #[error(transparent)]
    Profile(#[from] ProfileError),
}

impl AuthError {
    /// Message for a failure notification: the backend's own wording when it
    /// gave one, this error's wording for local failures, otherwise
    /// `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AuthError::Backend(err) => err
                .backend_message()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
            AuthError::MissingUser | AuthError::NotSignedIn => self.to_string(),
            AuthError::Profile(_) => fallback.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_message_wins() {
        let err = AuthError::from(AdapterError::Api {
            status: 429,
            code: Some("over_email_send_rate_limit".into()),
            message: "Email rate limit exceeded".into(),
        });
        assert_eq!(err.user_message("Something went wrong"), "Email rate limit exceeded");
    }

    #[test]
    fn transport_failures_use_fallback() {
        let err = AuthError::from(AdapterError::Transport("dns error".into()));
        assert_eq!(err.user_message("Something went wrong"), "Something went wrong");
    }

    #[test]
    fn local_failures_describe_themselves() {
        assert_eq!(
            AuthError::MissingUser.user_message("fallback"),
            "No user data returned from sign up"
        );
    }
}
