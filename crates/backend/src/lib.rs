//! "Login with Google" backend: OAuth2 redirect flow that resolves a local
//! user and issues a session cookie.

use std::sync::Arc;

use axum::{http::StatusCode, routing::get, Router};

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
mod models;
pub mod repository;
mod schema;

use auth::google::{GoogleSso, IdentityProvider, SsoError};
use auth::jwt::{JwtIssuer, TokenIssuer};
use auth::types::AuthConfig;
use config::AppConfig;
use repository::UserStore;

/// Common prefix of the SSO routes.
pub const API_PREFIX: &str = "/v1/google";

/// Shared handler state. Every collaborator sits behind a trait object so
/// tests can swap in fakes.
#[derive(Clone)]
pub struct AppState {
    pub auth_config: Arc<AuthConfig>,
    pub sso: Arc<dyn IdentityProvider>,
    pub users: Arc<dyn UserStore>,
    pub tokens: Arc<dyn TokenIssuer>,
}

impl AppState {
    /// Wire the production collaborators from configuration.
    pub fn from_config(
        config: &AppConfig,
        users: Arc<dyn UserStore>,
    ) -> Result<Self, SsoError> {
        Ok(Self {
            auth_config: Arc::new(config.auth.clone()),
            sso: Arc::new(GoogleSso::new(config.google.clone())?),
            users,
            tokens: Arc::new(JwtIssuer::new(&config.auth)),
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest(API_PREFIX, auth::router())
        .with_state(state)
}

async fn health_check() -> StatusCode {
    StatusCode::OK
}
