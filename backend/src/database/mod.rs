//! Module for backend connection setup and common data-access utilities.
//!
//! This module is responsible for building the hosted backend client from the
//! application configuration and exposes the table models and queries used
//! by the services.

pub mod models;
pub mod queries;

use std::sync::Arc;

use adapters::{AdapterError, HostedBackend, HostedClient, HostedClientConfig};
use tracing::info;

use crate::config::Config;

pub fn connect(config: &Config) -> Result<Arc<dyn HostedBackend>, AdapterError> {
    let client = HostedClient::new(HostedClientConfig {
        base_url: config.backend_url.clone(),
        anon_key: config.anon_key.clone(),
        timeout: config.http_timeout,
    })?;

    info!(backend_url = %config.backend_url, "hosted backend client ready");
    Ok(Arc::new(client))
}
