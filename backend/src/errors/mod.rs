//! Global application error types and handlers.
//!
//! This module defines the error type returned by HTTP handlers and maps
//! every failure to a status code and a JSON body.

use adapters::AdapterError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::auth::errors::AuthError;
use crate::auth::validation::ValidationErrors;
use crate::services::profile::ProfileError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(ValidationErrors),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Administrator privileges required")]
    Forbidden,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Profile(#[from] ProfileError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Auth(err) => auth_status(err),
            AppError::Profile(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Status for an auth failure. Client errors reported by the backend keep
/// their code; everything else on the backend side is a bad gateway.
pub fn auth_status(err: &AuthError) -> StatusCode {
    match err {
        AuthError::Backend(AdapterError::Api { status, .. }) if (400..500).contains(status) => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST)
        }
        AuthError::Backend(AdapterError::NotFound) => StatusCode::NOT_FOUND,
        AuthError::Backend(AdapterError::Config(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        AuthError::NotSignedIn => StatusCode::UNAUTHORIZED,
        AuthError::Backend(_) | AuthError::MissingUser | AuthError::Profile(_) => {
            StatusCode::BAD_GATEWAY
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        let body = match &self {
            AppError::Validation(fields) => json!({ "error": "Invalid input", "fields": fields }),
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
