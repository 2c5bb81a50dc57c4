//! Defines the HTTP routes for the caller's profile and role.

use std::sync::Arc;

use axum::{routing::get, Router};

use super::handlers::{get_admin_status, get_profile};
use crate::state::AppState;

pub fn user_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/profile", get(get_profile))
        .route("/admin", get(get_admin_status))
}
