//! Central module for organizing the application's main API endpoints.
//!
//! This module acts as a top-level container for the API domains, such as
//! user profiles and administrator-only endpoints, excluding core
//! authentication routes which are handled separately.

pub mod user;

use std::sync::Arc;

use axum::{middleware::from_fn_with_state, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::auth::middleware::{require_admin, CurrentUser};
use crate::state::AppState;

pub fn api_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let admin = Router::new()
        .route("/ping", get(admin_ping))
        .route_layer(from_fn_with_state(state, require_admin));

    Router::new()
        .nest("/user", user::routes::user_router())
        .nest("/admin", admin)
}

async fn admin_ping(current: CurrentUser) -> Json<Value> {
    Json(json!({ "ok": true, "user_id": current.session.user.id }))
}
