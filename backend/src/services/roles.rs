//! Role resolution: decides whether a user holds administrator privileges.
//!
//! Every failure path resolves to "not admin".

use adapters::{HostedBackend, Session, UserId};
use serde_json::Value;
use tracing::{debug, warn};

use crate::database::queries;

/// Asks the backend's `is_admin` procedure about `user_id`.
///
/// An empty id returns `false` without calling the backend. Procedure or
/// transport errors are logged and also return `false`; nothing escapes.
pub async fn is_user_admin(
    backend: &dyn HostedBackend,
    session: Option<&Session>,
    user_id: &UserId,
) -> bool {
    if user_id.is_empty() {
        return false;
    }

    let access_token = session.map(|s| s.access_token.as_str());

    match queries::call_is_admin(backend, access_token, user_id).await {
        Ok(value) => {
            let is_admin = is_truthy(&value);
            debug!(%user_id, is_admin, "resolved admin role");
            is_admin
        }
        Err(err) => {
            warn!(%user_id, error = %err, "admin check failed, denying");
            false
        }
    }
}

/// Loose truthiness: `null`, `false`, `0` and `""` are false, every other
/// value (objects and arrays included) is true.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adapters::testing::{fixtures, MockBackend};
    use adapters::AdapterError;
    use serde_json::json;

    use crate::database::queries::IS_ADMIN_FUNCTION;

    #[tokio::test]
    async fn empty_id_denies_without_calling_backend() {
        let backend = MockBackend::new().with_rpc(IS_ADMIN_FUNCTION, Ok(json!(true)));

        assert!(!is_user_admin(&backend, None, &UserId::new("")).await);
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn backend_errors_deny() {
        let errors = [
            AdapterError::Transport("connection reset".into()),
            AdapterError::Api {
                status: 404,
                code: Some("PGRST202".into()),
                message: "Could not find the function".into(),
            },
            AdapterError::Decode("unexpected body".into()),
        ];

        for err in errors {
            let backend = MockBackend::new().with_rpc(IS_ADMIN_FUNCTION, Err(err));
            assert!(!is_user_admin(&backend, None, &UserId::new("u1")).await);
        }
    }

    #[tokio::test]
    async fn unscripted_procedure_denies() {
        let backend = MockBackend::new();
        assert!(!is_user_admin(&backend, None, &UserId::new("u1")).await);
    }

    #[tokio::test]
    async fn truthy_results_grant() {
        for value in [json!(true), json!(1), json!("yes"), json!({ "role": "admin" })] {
            let backend = MockBackend::new().with_rpc(IS_ADMIN_FUNCTION, Ok(value));
            let session = fixtures::session(fixtures::user("u1", "admin@example.com"));
            assert!(is_user_admin(&backend, Some(&session), &session.user.id).await);
        }
    }

    #[tokio::test]
    async fn falsy_results_deny() {
        for value in [json!(false), json!(null), json!(0), json!("")] {
            let backend = MockBackend::new().with_rpc(IS_ADMIN_FUNCTION, Ok(value));
            assert!(!is_user_admin(&backend, None, &UserId::new("u1")).await);
        }
    }

    #[test]
    fn truthiness_matches_loose_semantics() {
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!(0.5)));
        assert!(!is_truthy(&json!(0.0)));
    }
}
