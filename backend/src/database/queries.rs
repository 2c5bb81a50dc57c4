//! Database query functions (Data Access Objects).
//!
//! This module centralizes all direct data-API operations, providing reusable
//! functions for interacting with the hosted tables and procedures and
//! abstracting the request shapes from higher-level services and API
//! handlers.

use adapters::{AdapterError, HostedBackend, UserId};
use serde_json::{json, Value};

use super::models::{NewProfile, Profile, PROFILES_TABLE};

pub const IS_ADMIN_FUNCTION: &str = "is_admin";

/// Looks up the profile keyed by `user_id`. Absence is `Ok(None)`.
pub async fn find_profile(
    backend: &dyn HostedBackend,
    access_token: Option<&str>,
    user_id: &UserId,
) -> Result<Option<Profile>, AdapterError> {
    match backend
        .select_one(access_token, PROFILES_TABLE, "id", user_id.as_str())
        .await
    {
        Ok(row) => Ok(Some(serde_json::from_value(row)?)),
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(err),
    }
}

pub async fn insert_profile(
    backend: &dyn HostedBackend,
    access_token: Option<&str>,
    profile: &NewProfile<'_>,
) -> Result<Profile, AdapterError> {
    let row = backend
        .insert(access_token, PROFILES_TABLE, serde_json::to_value(profile)?)
        .await?;

    Ok(serde_json::from_value(row)?)
}

/// Raw result of the `is_admin` procedure; interpretation is up to the caller.
pub async fn call_is_admin(
    backend: &dyn HostedBackend,
    access_token: Option<&str>,
    user_id: &UserId,
) -> Result<Value, AdapterError> {
    backend
        .rpc(
            access_token,
            IS_ADMIN_FUNCTION,
            json!({ "user_id": user_id.as_str() }),
        )
        .await
}
