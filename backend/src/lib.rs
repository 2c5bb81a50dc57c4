//! SEOForge backend.
//!
//! Initializes the Axum web server in front of the hosted auth/data backend
//! and registers the authentication routes, the user API, and the shared
//! middleware. The browser front-end talks to this service only; the
//! notifications and navigation it should perform come back as `effects` in
//! each auth response.
//!
//! # Routes
//!
//! | Method | Path | Purpose |
//! |---|---|---|
//! | POST | `/auth/signup` | create an account |
//! | POST | `/auth/signin` | sign in, bootstrap profile and role |
//! | POST | `/auth/signout` | invalidate the caller's session |
//! | POST | `/auth/reset-password` | send a reset email |
//! | POST | `/auth/update-password` | change the caller's password |
//! | POST | `/auth/refresh` | exchange a refresh token |
//! | GET | `/api/user/profile` | the caller's profile, created on first use |
//! | GET | `/api/user/admin` | whether the caller is an administrator |
//! | GET | `/api/admin/ping` | administrator-only probe |
//!
//! # Configuration
//!
//! Read from the environment, see `config`. `SEOFORGE_BACKEND_URL` and
//! `SEOFORGE_BACKEND_ANON_KEY` are required; the key may also be mounted at
//! `/run/secrets/SEOFORGE_BACKEND_ANON_KEY`.

pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod errors;
pub mod middleware;
pub mod services;
pub mod state;

use std::{error::Error, net::SocketAddr, sync::Arc};

use axum::{routing::get, Router};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};

use config::Config;
use state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .nest("/auth", auth::auth_router())
        .nest("/api", api::api_router(state.clone()))
        .layer(middleware::cors(&state.config.site_origin))
        .layer(middleware::trace())
        .with_state(state)
}

pub async fn start_server() -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("Loading configuration...");
    let config = Config::load()?;
    let address = SocketAddr::from(([0, 0, 0, 0], config.port));

    let state = AppState::new(config)?;

    info!("Binding to {address}");
    let listener = TcpListener::bind(address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn root_handler() -> &'static str {
    "Welcome to SEOForge!"
}

async fn health_handler() -> &'static str {
    "ok"
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to listen for Ctrl+C: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install terminate handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
