//! Shared application state handed to every handler.

use std::sync::Arc;

use adapters::{AdapterError, HostedBackend};

use crate::auth::service::{AuthService, Redirects};
use crate::config::Config;
use crate::database;

pub struct AppState {
    pub config: Config,
    pub backend: Arc<dyn HostedBackend>,
    pub auth: AuthService,
}

impl AppState {
    pub fn new(config: Config) -> Result<Arc<Self>, AdapterError> {
        let backend = database::connect(&config)?;
        Ok(Self::with_backend(config, backend))
    }

    pub fn with_backend(config: Config, backend: Arc<dyn HostedBackend>) -> Arc<Self> {
        let auth = AuthService::new(backend.clone(), Redirects::new(&config.site_origin));

        Arc::new(Self {
            config,
            backend,
            auth,
        })
    }
}
