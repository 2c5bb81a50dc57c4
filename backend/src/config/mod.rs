//! Central module for application-wide configuration settings.
//!
//! This module handles loading and managing configuration parameters such as
//! the hosted backend URL and key, the front-end origin used for redirect
//! links, the server port, and the outbound request timeout.

use std::{env, fmt, fs::read_to_string, time::Duration};

use thiserror::Error;
use tracing::{info, warn};
use url::Url;

const BACKEND_URL: &str = "SEOFORGE_BACKEND_URL";
const BACKEND_ANON_KEY: &str = "SEOFORGE_BACKEND_ANON_KEY";
const SITE_ORIGIN: &str = "SEOFORGE_SITE_ORIGIN";
const PORT: &str = "SEOFORGE_PORT";
const HTTP_TIMEOUT_SECS: &str = "SEOFORGE_HTTP_TIMEOUT_SECS";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("Invalid {key} value: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Clone)]
pub struct Config {
    pub backend_url: String,
    pub anon_key: String,
    /// ASCII origin of the front-end, without a trailing slash.
    pub site_origin: String,
    pub port: u16,
    pub http_timeout: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("backend_url", &self.backend_url)
            .field("site_origin", &self.site_origin)
            .field("port", &self.port)
            .field("http_timeout", &self.http_timeout)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok(), read_secret)
    }

    /// Builds the configuration from arbitrary variable and secret sources.
    pub fn from_lookup(
        var: impl Fn(&str) -> Option<String>,
        secret: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let backend_url = var(BACKEND_URL)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing(BACKEND_URL))?;
        Url::parse(&backend_url).map_err(|e| ConfigError::Invalid {
            key: BACKEND_URL,
            reason: e.to_string(),
        })?;

        let anon_key = var(BACKEND_ANON_KEY)
            .or_else(|| secret(BACKEND_ANON_KEY))
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing(BACKEND_ANON_KEY))?;

        let site_origin = normalize_origin(&or_default(&var, SITE_ORIGIN, "http://localhost:5173"))?;
        let port = parse(PORT, &or_default(&var, PORT, "3000"))?;
        let timeout_secs: u64 = parse(HTTP_TIMEOUT_SECS, &or_default(&var, HTTP_TIMEOUT_SECS, "30"))?;

        Ok(Self {
            backend_url,
            anon_key,
            site_origin,
            port,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn or_default(var: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn parse<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }
    })
}

/// Reduces a URL to its origin (`scheme://host[:port]`), the base that
/// redirect paths are appended to.
pub fn normalize_origin(raw: &str) -> Result<String, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::Invalid {
        key: SITE_ORIGIN,
        reason: e.to_string(),
    })?;

    let origin = url.origin();
    if !origin.is_tuple() {
        return Err(ConfigError::Invalid {
            key: SITE_ORIGIN,
            reason: format!("{raw} has no usable origin"),
        });
    }

    Ok(origin.ascii_serialization())
}

fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            warn!("Failed to read {secret_name} from file: {e}");
        })
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn no_secrets(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_apply_when_optional_values_are_missing() {
        let config = Config::from_lookup(
            lookup(&[
                (BACKEND_URL, "https://abc.example.co"),
                (BACKEND_ANON_KEY, "anon"),
            ]),
            no_secrets,
        )
        .unwrap();

        assert_eq!(config.site_origin, "http://localhost:5173");
        assert_eq!(config.port, 3000);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
    }

    #[test]
    fn anon_key_falls_back_to_secret_file() {
        let config = Config::from_lookup(
            lookup(&[(BACKEND_URL, "https://abc.example.co")]),
            |name| (name == BACKEND_ANON_KEY).then(|| "from-secret".to_string()),
        )
        .unwrap();
        assert_eq!(config.anon_key, "from-secret");
    }

    #[test]
    fn missing_backend_url_is_an_error() {
        let err = Config::from_lookup(lookup(&[(BACKEND_ANON_KEY, "anon")]), no_secrets).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(BACKEND_URL)));
    }

    #[test]
    fn bad_port_is_an_error() {
        let err = Config::from_lookup(
            lookup(&[
                (BACKEND_URL, "https://abc.example.co"),
                (BACKEND_ANON_KEY, "anon"),
                (PORT, "eighty"),
            ]),
            no_secrets,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: PORT, .. }));
    }

    #[test]
    fn origin_drops_path_and_trailing_slash() {
        assert_eq!(
            normalize_origin("https://app.example.com/dashboard/").unwrap(),
            "https://app.example.com"
        );
        assert_eq!(
            normalize_origin("http://localhost:5173/").unwrap(),
            "http://localhost:5173"
        );
        assert!(normalize_origin("data:text/plain,hi").is_err());
    }

    #[test]
    fn debug_output_hides_the_key() {
        let config = Config::from_lookup(
            lookup(&[
                (BACKEND_URL, "https://abc.example.co"),
                (BACKEND_ANON_KEY, "super-secret-key"),
            ]),
            no_secrets,
        )
        .unwrap();
        assert!(!format!("{config:?}").contains("super-secret-key"));
    }
}
