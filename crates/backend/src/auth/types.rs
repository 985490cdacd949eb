//! Auth-related types and configuration.

use serde::{Deserialize, Serialize};

// Re-export shared types for convenience
pub use shared_types::AuthUserResponse;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE_NAME: &str = "auth_token";

/// Name of the cookie carrying the login `state` between login and callback.
pub const STATE_COOKIE_NAME: &str = "sso_state";

/// Lifetime of the login state cookie.
pub const STATE_COOKIE_MAX_AGE_SECS: i64 = 10 * 60;

/// JWT Claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user email)
    pub sub: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Session settings, built once by `AppConfig`.
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_duration_days: i64,
    /// Add `Secure` to every cookie we set.
    pub secure_cookies: bool,
}

impl AuthConfig {
    pub fn token_max_age_secs(&self) -> i64 {
        self.token_duration_days * 24 * 60 * 60
    }
}

/// Identity confirmed by the provider for one callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub email: String,
    pub display_name: Option<String>,
    pub provider: String,
}

/// Query parameters Google appends to the callback URL.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Everything the provider needs to verify a callback.
#[derive(Debug, Clone, Default)]
pub struct CallbackRequest {
    pub params: CallbackParams,
    /// Value of the login state cookie, if the browser sent one.
    pub state_cookie: Option<String>,
}
