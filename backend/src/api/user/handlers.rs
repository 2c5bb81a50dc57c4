//! Handler functions for user profile and role endpoints.
//!
//! These functions resolve the caller's profile (creating the default one on
//! first use) and administrator status.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::auth::middleware::CurrentUser;
use crate::database::models::Profile;
use crate::errors::AppError;
use crate::services::{profile, roles};
use crate::state::AppState;

pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> Result<Json<Option<Profile>>, AppError> {
    let session = &current.session;
    let profile =
        profile::fetch_or_create_profile(state.backend.as_ref(), Some(session), &session.user.id)
            .await?;

    Ok(Json(profile))
}

#[derive(Debug, Serialize)]
pub struct AdminStatus {
    pub is_admin: bool,
}

pub async fn get_admin_status(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> Json<AdminStatus> {
    let session = &current.session;
    let is_admin = roles::is_user_admin(state.backend.as_ref(), Some(session), &session.user.id).await;

    Json(AdminStatus { is_admin })
}
