//! Profile bootstrap: fetch the caller's profile, creating a default one on
//! first use.

use adapters::{AdapterError, HostedBackend, Session, UserId};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::database::models::{NewProfile, Profile};
use crate::database::queries;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Failed to fetch profile: {0}")]
    Fetch(#[source] AdapterError),

    #[error("Stored profile could not be read: {0}")]
    Decode(String),
}

impl From<AdapterError> for ProfileError {
    fn from(err: AdapterError) -> Self {
        match err {
            AdapterError::Decode(reason) => ProfileError::Decode(reason),
            other => ProfileError::Fetch(other),
        }
    }
}

/// Returns the profile for `user_id`, inserting a default one
/// (`is_active = true`, `plan_type = "free"`) when none exists.
///
/// At most one read and one write are issued. A failed fetch propagates; a
/// failed insert is only logged and yields `Ok(None)`. When the insert
/// succeeds the stored row is returned, not the empty pre-insert read.
pub async fn fetch_or_create_profile(
    backend: &dyn HostedBackend,
    session: Option<&Session>,
    user_id: &UserId,
) -> Result<Option<Profile>, ProfileError> {
    let access_token = session.map(|s| s.access_token.as_str());

    if let Some(profile) = queries::find_profile(backend, access_token, user_id).await? {
        debug!(%user_id, "profile found");
        return Ok(Some(profile));
    }

    match queries::insert_profile(backend, access_token, &NewProfile::for_user(user_id)).await {
        Ok(profile) => {
            info!(%user_id, "created default profile");
            Ok(Some(profile))
        }
        Err(err) => {
            warn!(%user_id, error = %err, "failed to create default profile");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adapters::testing::{fixtures, Call, MockBackend};
    use serde_json::json;

    use crate::database::models::PROFILES_TABLE;

    #[tokio::test]
    async fn absent_profile_is_created_once_with_defaults() {
        let backend = MockBackend::new();
        let user_id = UserId::new("u1");

        let profile = fetch_or_create_profile(&backend, None, &user_id)
            .await
            .unwrap()
            .expect("created profile is returned");

        assert_eq!(
            backend.inserts(PROFILES_TABLE),
            vec![json!({ "id": "u1", "is_active": true, "plan_type": "free" })]
        );
        assert_eq!(profile.id, user_id);
        assert!(profile.is_active);
        assert_eq!(profile.plan_type, "free");
    }

    #[tokio::test]
    async fn existing_profile_is_returned_without_insert() {
        let row = json!({
            "id": "u1",
            "full_name": "Ada Lovelace",
            "avatar_url": null,
            "is_active": true,
            "plan_type": "pro"
        });
        let backend = MockBackend::new().with_row(PROFILES_TABLE, row);

        let profile = fetch_or_create_profile(&backend, None, &UserId::new("u1"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(profile.full_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(profile.plan_type, "pro");
        assert_eq!(backend.call_count(|c| matches!(c, Call::Insert { .. })), 0);
    }

    #[tokio::test]
    async fn fetch_failure_propagates_and_skips_insert() {
        let backend = MockBackend::new().fail_select(AdapterError::Api {
            status: 401,
            code: Some("42501".into()),
            message: "permission denied for table profiles".into(),
        });

        let err = fetch_or_create_profile(&backend, None, &UserId::new("u1"))
            .await
            .unwrap_err();

        assert!(matches!(err, ProfileError::Fetch(AdapterError::Api { status: 401, .. })));
        assert!(backend.inserts(PROFILES_TABLE).is_empty());
    }

    #[tokio::test]
    async fn insert_failure_is_absorbed() {
        let backend = MockBackend::new().fail_insert(AdapterError::Api {
            status: 409,
            code: Some("23505".into()),
            message: "duplicate key value violates unique constraint".into(),
        });

        let result = fetch_or_create_profile(&backend, None, &UserId::new("u1")).await;

        assert!(matches!(result, Ok(None)));
        assert_eq!(backend.inserts(PROFILES_TABLE).len(), 1);
    }

    #[tokio::test]
    async fn session_token_is_used_for_lookup() {
        let session = fixtures::session(fixtures::user("u1", "user@example.com"));
        let backend = MockBackend::new();

        fetch_or_create_profile(&backend, Some(&session), &session.user.id)
            .await
            .unwrap();

        assert_eq!(backend.call_count(|c| matches!(c, Call::SelectOne { .. })), 1);
    }
}
