//! Core `adapters` crate for abstracting the hosted auth/data backend.
//!
//! This crate defines the `HostedBackend` trait, which outlines the auth,
//! data and remote-procedure surfaces the application consumes, and provides
//! the concrete HTTP implementation (`HostedClient`) alongside an in-memory
//! double for tests.

pub mod errors;
pub mod hosted;
pub mod models;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

use async_trait::async_trait;
use serde_json::Value;

pub use errors::AdapterError;
pub use hosted::{HostedClient, HostedClientConfig};
pub use models::{AuthResponse, Credentials, Session, SignUpRequest, User, UserId};

/// The hosted backend as seen by the application.
///
/// Every method performs exactly one request. Data and RPC calls take an
/// optional user access token; without one they run with the project's
/// anonymous key, and row-level policies on the backend decide what that
/// may see.
#[async_trait]
pub trait HostedBackend: Send + Sync {
    /// Creates an account. The response may lack a user or a session; the
    /// caller decides what that means.
    async fn sign_up(&self, request: &SignUpRequest) -> Result<AuthResponse, AdapterError>;

    async fn sign_in_with_password(
        &self,
        credentials: &Credentials,
    ) -> Result<Session, AdapterError>;

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, AdapterError>;

    /// Resolves the user owning `access_token`, failing if the token is no
    /// longer valid.
    async fn get_user(&self, access_token: &str) -> Result<User, AdapterError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), AdapterError>;

    async fn reset_password_for_email(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> Result<(), AdapterError>;

    async fn update_password(
        &self,
        access_token: &str,
        password: &str,
    ) -> Result<User, AdapterError>;

    /// Fetches the single row of `table` whose `column` equals `value`.
    /// Returns `AdapterError::NotFound` when nothing matched.
    async fn select_one(
        &self,
        access_token: Option<&str>,
        table: &str,
        column: &str,
        value: &str,
    ) -> Result<Value, AdapterError>;

    /// Inserts `row` into `table` and returns the stored representation.
    async fn insert(
        &self,
        access_token: Option<&str>,
        table: &str,
        row: Value,
    ) -> Result<Value, AdapterError>;

    /// Invokes a named remote procedure.
    async fn rpc(
        &self,
        access_token: Option<&str>,
        function: &str,
        args: Value,
    ) -> Result<Value, AdapterError>;
}
