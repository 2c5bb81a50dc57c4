//! Handler functions for authentication-related API endpoints.
//!
//! These functions parse and validate the request forms, run the matching
//! `AuthFlow` operation, and answer with `{ data, error, effects }` so the
//! front-end can show the notifications and follow the navigation.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::effects::{AuthFlow, EffectLog};
use super::errors::AuthError;
use super::middleware::CurrentUser;
use super::models::{
    DataResult, Effect, ResetPasswordForm, SignInForm, SignUpData, SignUpForm, UpdatePasswordForm,
};
use super::validation::Validate;
use crate::errors::{auth_status, AppError};
use crate::services::session::{AuthState, SessionStore};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct FlowResponse<T> {
    pub data: Option<T>,
    pub error: Option<String>,
    pub effects: Vec<Effect>,
    #[serde(skip)]
    status: StatusCode,
}

impl<T> FlowResponse<T> {
    fn new(result: DataResult<T>, effects: EffectLog) -> Self {
        let status = result
            .error
            .as_ref()
            .map(auth_status)
            .unwrap_or(StatusCode::OK);

        Self {
            data: result.data,
            error: result.error.map(|err| err.to_string()),
            effects: effects.into_effects(),
            status,
        }
    }
}

impl<T: Serialize> IntoResponse for FlowResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

fn owned_state(result: DataResult<Arc<AuthState>>) -> DataResult<AuthState> {
    DataResult {
        data: result.data.map(|state| AuthState::clone(&state)),
        error: result.error,
    }
}

pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    Json(form): Json<SignUpForm>,
) -> Result<FlowResponse<SignUpData>, AppError> {
    form.validate().map_err(AppError::Validation)?;

    let log = EffectLog::new();
    let result = AuthFlow::new(&state.auth, &log)
        .sign_up(&form.email, &form.password, form.full_name.trim())
        .await;

    Ok(FlowResponse::new(result.into(), log))
}

pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    Json(form): Json<SignInForm>,
) -> Result<FlowResponse<AuthState>, AppError> {
    form.validate().map_err(AppError::Validation)?;

    let log = EffectLog::new();
    let store = SessionStore::new();
    let result = AuthFlow::new(&state.auth, &log)
        .sign_in(&store, &form.email, &form.password)
        .await;

    Ok(FlowResponse::new(owned_state(result), log))
}

pub async fn sign_out(State(state): State<Arc<AppState>>, current: CurrentUser) -> FlowResponse<()> {
    let log = EffectLog::new();
    AuthFlow::new(&state.auth, &log)
        .sign_out(&current.store())
        .await;

    FlowResponse::new(DataResult::ok(()), log)
}

pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Json(form): Json<ResetPasswordForm>,
) -> Result<FlowResponse<()>, AppError> {
    form.validate().map_err(AppError::Validation)?;

    let log = EffectLog::new();
    let result = AuthFlow::new(&state.auth, &log)
        .reset_password(&form.email)
        .await;

    Ok(FlowResponse::new(result, log))
}

pub async fn update_password(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(form): Json<UpdatePasswordForm>,
) -> Result<FlowResponse<adapters::User>, AppError> {
    form.validate().map_err(AppError::Validation)?;

    let log = EffectLog::new();
    let result = AuthFlow::new(&state.auth, &log)
        .update_password(&current.store(), &form.password)
        .await;

    Ok(FlowResponse::new(result, log))
}

#[derive(Deserialize)]
pub struct RefreshForm {
    pub refresh_token: String,
}

/// Exchanges a refresh token for a new session. No UI effects.
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(form): Json<RefreshForm>,
) -> FlowResponse<AuthState> {
    let result: Result<_, AuthError> = state
        .auth
        .resume(&SessionStore::new(), &form.refresh_token)
        .await;

    FlowResponse::new(owned_state(result.into()), EffectLog::new())
}
