//! Authentication module for "Login with Google".
//!
//! This module provides:
//! - The Google OAuth2 client behind the `IdentityProvider` trait
//! - JWT session token creation and validation
//! - Login, callback, current-user and logout handlers

pub mod cookies;
pub mod google;
mod handlers;
pub mod jwt;
pub mod types;

use axum::{routing::get, Router};

use crate::AppState;

pub use handlers::{auth_logout, auth_me, google_callback, google_login};

/// Routes mounted under `/v1/google`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(google_login))
        .route("/callback", get(google_callback))
        .route("/me", get(auth_me))
        .route("/logout", get(auth_logout))
}
