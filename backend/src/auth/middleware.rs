//! Middleware for protecting authenticated routes and handling authorization.
//!
//! This module contains the `CurrentUser` extractor, which validates the
//! bearer token against the backend, and the `require_admin` layer, which
//! lets a request through only when role resolution says the caller is an
//! administrator.

use std::sync::Arc;

use adapters::Session;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::errors::AppError;
use crate::services::roles;
use crate::services::session::SessionStore;
use crate::state::AppState;

/// The caller, authenticated by `Authorization: Bearer <access token>`.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub session: Session,
}

impl CurrentUser {
    /// A request-scoped store holding the caller's session.
    pub fn store(&self) -> SessionStore {
        SessionStore::with_session(self.session.clone())
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(current) = parts.extensions.get::<CurrentUser>() {
            return Ok(current.clone());
        }

        let token = bearer_token(&parts.headers)
            .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;

        let user = state.backend.get_user(token).await.map_err(|err| {
            debug!(error = %err, "rejected bearer token");
            AppError::Unauthorized("Invalid or expired session".to_string())
        })?;

        let current = CurrentUser {
            session: Session::from_bearer(token, user),
        };
        parts.extensions.insert(current.clone());
        Ok(current)
    }
}

/// Rejects with 403 unless the caller resolves as an administrator.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = &current.session.user.id;

    if !roles::is_user_admin(state.backend.as_ref(), Some(&current.session), user_id).await {
        debug!(%user_id, "admin route denied");
        return Err(AppError::Forbidden);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn parses_bearer_tokens() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(&headers("bearer abc")), Some("abc"));
    }

    #[test]
    fn rejects_other_schemes_and_blanks() {
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwdw==")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&headers("Bearer")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
