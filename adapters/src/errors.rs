//! Custom error types specific to the `adapters` crate.
//!
//! This module defines errors that can occur while talking to the hosted
//! backend: transport failures, rejected requests, undecodable bodies, and the
//! distinguished "no matching row" outcome of the data API.

use serde_json::Value;
use thiserror::Error;

/// Data-API error code reported when a single-row query matched nothing.
pub const NO_ROWS_CODE: &str = "PGRST116";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    #[error("No matching row found")]
    NotFound,

    #[error("{message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Invalid backend configuration: {0}")]
    Config(String),
}

impl AdapterError {
    /// Whether this is the "no matching row" outcome, which callers treat as
    /// an absent record rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AdapterError::NotFound)
    }

    /// The backend-supplied message, if the backend gave one.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            AdapterError::Api { message, .. } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }

    /// Builds an error from a non-success response body.
    ///
    /// The hosted service is not consistent about where it puts the message:
    /// the auth API uses `msg` or `error_description`, the data API uses
    /// `message`. The first one present wins.
    pub fn from_response(status: u16, reason: &str, body: &str) -> Self {
        let parsed: Option<Value> = serde_json::from_str(body).ok();

        let code = parsed.as_ref().and_then(|value| {
            ["code", "error_code"]
                .iter()
                .find_map(|key| match value.get(key) {
                    Some(Value::String(s)) => Some(s.clone()),
                    Some(Value::Number(n)) => Some(n.to_string()),
                    _ => None,
                })
        });

        if code.as_deref() == Some(NO_ROWS_CODE) {
            return AdapterError::NotFound;
        }

        let message = parsed
            .as_ref()
            .and_then(|value| {
                ["msg", "message", "error_description", "error"]
                    .iter()
                    .find_map(|key| value.get(key).and_then(Value::as_str))
                    .map(str::to_string)
            })
            .unwrap_or_else(|| reason.to_string());

        AdapterError::Api {
            status,
            code,
            message,
        }
    }
}

impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AdapterError::Decode(err.to_string())
        } else {
            AdapterError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AdapterError {
    fn from(err: serde_json::Error) -> Self {
        AdapterError::Decode(err.to_string())
    }
}
