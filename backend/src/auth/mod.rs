//! Authentication module for managing user accounts, sessions, and access control.
//!
//! This module provides the public interface for authentication-related
//! functionality: the auth operations and their UI effects, form validation,
//! the HTTP routes, and the middleware that authenticates callers and gates
//! administrator-only routes.

pub mod effects;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;
pub mod validation;

// Re-exports for convenience
pub use effects::{AuthFlow, EffectHandler, EffectLog};
pub use errors::AuthError;
pub use middleware::{require_admin, CurrentUser};
pub use models::{DataResult, Effect, Notification, NotificationLevel, Route, SignUpData};
pub use routes::auth_router;
pub use service::{AuthService, Redirects};
