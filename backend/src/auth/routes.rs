//! Defines the HTTP routes specifically for authentication.
//!
//! These routes handle sign-up, sign-in, sign-out, password reset and
//! update, and session refresh. They are designed to be nested into the main
//! Axum router under `/auth`.

use std::sync::Arc;

use axum::{routing::post, Router};

use super::handlers::{refresh, reset_password, sign_in, sign_out, sign_up, update_password};
use crate::state::AppState;

pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/signup", post(sign_up))
        .route("/signin", post(sign_in))
        .route("/signout", post(sign_out))
        .route("/reset-password", post(reset_password))
        .route("/update-password", post(update_password))
        .route("/refresh", post(refresh))
}
