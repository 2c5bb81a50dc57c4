//! HTTP implementation of `HostedBackend` for the hosted auth/data service.
//!
//! This file contains the concrete client: request construction for the auth
//! API (`/auth/v1`), the data API (`/rest/v1`) and its RPC endpoint, plus the
//! conversion of non-success responses into `AdapterError`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

use crate::errors::AdapterError;
use crate::models::{AuthResponse, Credentials, Session, SignUpRequest, User};
use crate::HostedBackend;

/// Makes the data API answer with a bare object and report zero rows as an
/// error instead of an empty array.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

#[derive(Debug, Clone)]
pub struct HostedClientConfig {
    pub base_url: String,
    pub anon_key: String,
    pub timeout: Duration,
}

pub struct HostedClient {
    http: Client,
    base_url: Url,
    anon_key: String,
}

impl HostedClient {
    pub fn new(config: HostedClientConfig) -> Result<Self, AdapterError> {
        let mut base_url = Url::parse(&config.base_url)
            .map_err(|err| AdapterError::Config(format!("{}: {err}", config.base_url)))?;

        if base_url.cannot_be_a_base() {
            return Err(AdapterError::Config(format!(
                "{} cannot be used as a base URL",
                config.base_url
            )));
        }

        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        if config.anon_key.trim().is_empty() {
            return Err(AdapterError::Config("anon key is empty".to_string()));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| AdapterError::Config(format!("Cannot build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_url,
            anon_key: config.anon_key,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, AdapterError> {
        self.base_url
            .join(path)
            .map_err(|err| AdapterError::Config(format!("Invalid endpoint {path}: {err}")))
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        access_token: Option<&str>,
    ) -> Result<RequestBuilder, AdapterError> {
        let url = self.endpoint(path)?;

        Ok(self
            .http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token.unwrap_or(&self.anon_key)))
    }

    /// Sends the request and returns the parsed body, or `None` for an empty
    /// success body.
    async fn send(request: RequestBuilder) -> Result<Option<Value>, AdapterError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AdapterError::from_response(
                status.as_u16(),
                status.canonical_reason().unwrap_or("Request failed"),
                &body,
            ));
        }

        if body.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(serde_json::from_str(&body)?))
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, AdapterError> {
        let body = Self::send(request)
            .await?
            .ok_or_else(|| AdapterError::Decode("empty response body".to_string()))?;

        Ok(serde_json::from_value(body)?)
    }
}

#[async_trait]
impl HostedBackend for HostedClient {
    async fn sign_up(&self, request: &SignUpRequest) -> Result<AuthResponse, AdapterError> {
        debug!(email = %request.email, "signing up");

        let builder = self
            .request(Method::POST, "auth/v1/signup", None)?
            .query(&[("redirect_to", request.redirect_to.as_str())])
            .json(&json!({
                "email": request.email,
                "password": request.password,
                "data": { "full_name": request.full_name },
            }));

        let body = Self::send(builder).await?.unwrap_or(Value::Null);
        AuthResponse::from_signup_body(body)
    }

    async fn sign_in_with_password(
        &self,
        credentials: &Credentials,
    ) -> Result<Session, AdapterError> {
        debug!(email = %credentials.email, "signing in with password");

        let builder = self
            .request(Method::POST, "auth/v1/token", None)?
            .query(&[("grant_type", "password")])
            .json(credentials);

        Self::send_json(builder).await
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, AdapterError> {
        debug!("refreshing session");

        let builder = self
            .request(Method::POST, "auth/v1/token", None)?
            .query(&[("grant_type", "refresh_token")])
            .json(&json!({ "refresh_token": refresh_token }));

        Self::send_json(builder).await
    }

    async fn get_user(&self, access_token: &str) -> Result<User, AdapterError> {
        let builder = self.request(Method::GET, "auth/v1/user", Some(access_token))?;
        Self::send_json(builder).await
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AdapterError> {
        debug!("signing out");

        let builder = self.request(Method::POST, "auth/v1/logout", Some(access_token))?;
        Self::send(builder).await.map(|_| ())
    }

    async fn reset_password_for_email(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> Result<(), AdapterError> {
        debug!(%email, %redirect_to, "requesting password reset email");

        let builder = self
            .request(Method::POST, "auth/v1/recover", None)?
            .query(&[("redirect_to", redirect_to)])
            .json(&json!({ "email": email }));

        Self::send(builder).await.map(|_| ())
    }

    async fn update_password(
        &self,
        access_token: &str,
        password: &str,
    ) -> Result<User, AdapterError> {
        debug!("updating password");

        let builder = self
            .request(Method::PUT, "auth/v1/user", Some(access_token))?
            .json(&json!({ "password": password }));

        Self::send_json(builder).await
    }

    async fn select_one(
        &self,
        access_token: Option<&str>,
        table: &str,
        column: &str,
        value: &str,
    ) -> Result<Value, AdapterError> {
        debug!(%table, %column, "selecting single row");

        let builder = self
            .request(Method::GET, &format!("rest/v1/{table}"), access_token)?
            .header(ACCEPT, SINGLE_OBJECT)
            .query(&[(column, format!("eq.{value}")), ("select", "*".to_string())]);

        Self::send_json(builder).await
    }

    async fn insert(
        &self,
        access_token: Option<&str>,
        table: &str,
        row: Value,
    ) -> Result<Value, AdapterError> {
        debug!(%table, "inserting row");

        let builder = self
            .request(Method::POST, &format!("rest/v1/{table}"), access_token)?
            .header(ACCEPT, SINGLE_OBJECT)
            .header("Prefer", "return=representation")
            .json(&row);

        Self::send_json(builder).await
    }

    async fn rpc(
        &self,
        access_token: Option<&str>,
        function: &str,
        args: Value,
    ) -> Result<Value, AdapterError> {
        debug!(%function, "calling remote procedure");

        let builder = self
            .request(Method::POST, &format!("rest/v1/rpc/{function}"), access_token)?
            .json(&args);

        Ok(Self::send(builder).await?.unwrap_or(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str, anon_key: &str) -> HostedClientConfig {
        HostedClientConfig {
            base_url: base_url.to_string(),
            anon_key: anon_key.to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn endpoints_are_joined_under_the_base_path() {
        let client = HostedClient::new(config("https://abc.example.co", "anon")).unwrap();
        assert_eq!(
            client.endpoint("auth/v1/signup").unwrap().as_str(),
            "https://abc.example.co/auth/v1/signup"
        );

        let client = HostedClient::new(config("http://localhost:54321/proxy", "anon")).unwrap();
        assert_eq!(
            client.endpoint("rest/v1/rpc/is_admin").unwrap().as_str(),
            "http://localhost:54321/proxy/rest/v1/rpc/is_admin"
        );
    }

    #[test]
    fn rejects_bad_configuration() {
        assert!(matches!(
            HostedClient::new(config("not a url", "anon")),
            Err(AdapterError::Config(_))
        ));
        assert!(matches!(
            HostedClient::new(config("https://abc.example.co", "  ")),
            Err(AdapterError::Config(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        // Nothing listens on the discard port.
        let client = HostedClient::new(HostedClientConfig {
            timeout: Duration::from_millis(500),
            ..config("http://127.0.0.1:9", "anon")
        })
        .unwrap();

        let err = client.get_user("token").await.unwrap_err();
        assert!(matches!(err, AdapterError::Transport(_)));
    }
}
