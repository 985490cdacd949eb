//! Google OAuth2 client.
//!
//! [`IdentityProvider`] is the seam the handlers talk to. [`GoogleSso`]
//! implements it with the authorization-code flow: build the consent URL,
//! then on callback check `state`, exchange the code and read the userinfo
//! endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use shared_types::SsoProvider;
use thiserror::Error;

use super::types::{CallbackRequest, VerifiedIdentity};

const AUTHORIZATION_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const USERINFO_ENDPOINT: &str = "https://openidconnect.googleapis.com/v1/userinfo";

const LOGIN_SCOPES: &str = "openid email profile";

/// Upper bound for each call to Google's token and userinfo endpoints.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum SsoError {
    /// The callback is malformed, forged, or was refused by Google
    #[error("{0}")]
    Verification(String),

    #[error("Request to Google failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Google {endpoint} endpoint returned HTTP {status}")]
    Upstream { endpoint: &'static str, status: u16 },
}

/// Redirect target plus the `state` value it carries.
#[derive(Debug, Clone)]
pub struct AuthorizationRedirect {
    pub url: String,
    pub state: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Build the consent-screen URL, appending `params` to the query.
    fn authorization_redirect(&self, params: &[(&str, &str)]) -> AuthorizationRedirect;

    /// Verify the provider's callback and return the confirmed identity.
    async fn verify_callback(&self, request: &CallbackRequest)
        -> Result<VerifiedIdentity, SsoError>;
}

#[derive(Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

#[derive(Debug, Clone)]
pub struct GoogleEndpoints {
    pub authorization: String,
    pub token: String,
    pub userinfo: String,
}

impl Default for GoogleEndpoints {
    fn default() -> Self {
        Self {
            authorization: AUTHORIZATION_ENDPOINT.to_string(),
            token: TOKEN_ENDPOINT.to_string(),
            userinfo: USERINFO_ENDPOINT.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GoogleTokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorResponse {
    error: String,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    email: Option<String>,
    email_verified: Option<bool>,
    name: Option<String>,
}

#[derive(Clone)]
pub struct GoogleSso {
    config: GoogleConfig,
    endpoints: GoogleEndpoints,
    http_client: Client,
}

impl GoogleSso {
    pub fn new(config: GoogleConfig) -> Result<Self, SsoError> {
        Self::with_endpoints(config, GoogleEndpoints::default())
    }

    /// Fails only if the HTTP client (TLS backend) cannot be initialised.
    pub fn with_endpoints(
        config: GoogleConfig,
        endpoints: GoogleEndpoints,
    ) -> Result<Self, SsoError> {
        let http_client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            config,
            endpoints,
            http_client,
        })
    }

    fn authorization_url(&self, state: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}",
            self.endpoints.authorization,
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_uri),
            urlencoding::encode(LOGIN_SCOPES),
            urlencoding::encode(state),
        );

        for (key, value) in params {
            url.push_str(&format!(
                "&{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            ));
        }

        url
    }

    async fn exchange_code(&self, code: &str) -> Result<GoogleTokenResponse, SsoError> {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];

        let response = self
            .http_client
            .post(&self.endpoints.token)
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if status.is_client_error() {
            // invalid_grant and friends: the code itself is bad
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<GoogleErrorResponse>(&body) {
                Ok(err) => err.error_description.unwrap_or(err.error),
                Err(_) => format!("HTTP {}", status.as_u16()),
            };
            return Err(SsoError::Verification(format!(
                "Google rejected the authorization code: {}",
                message
            )));
        }
        if !status.is_success() {
            return Err(SsoError::Upstream {
                endpoint: "token",
                status: status.as_u16(),
            });
        }

        Ok(response.json().await?)
    }

    async fn fetch_user_info(&self, access_token: &str) -> Result<GoogleUserInfo, SsoError> {
        let response = self
            .http_client
            .get(&self.endpoints.userinfo)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SsoError::Upstream {
                endpoint: "userinfo",
                status: response.status().as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}

/// Check the callback parameters against the login state and return the code.
fn check_callback_params(request: &CallbackRequest) -> Result<&str, SsoError> {
    let params = &request.params;

    if let Some(error) = &params.error {
        let reason = params.error_description.as_deref().unwrap_or(error);
        return Err(SsoError::Verification(format!(
            "Google returned an error: {}",
            reason
        )));
    }

    let code = params
        .code
        .as_deref()
        .filter(|c| !c.is_empty())
        .ok_or_else(|| {
            SsoError::Verification("'code' parameter was not found in callback request".into())
        })?;

    let state = params.state.as_deref().ok_or_else(|| {
        SsoError::Verification("'state' parameter was not found in callback request".into())
    })?;

    match request.state_cookie.as_deref() {
        Some(expected) if expected == state => Ok(code),
        Some(_) => Err(SsoError::Verification(
            "'state' parameter does not match the login request".into(),
        )),
        None => Err(SsoError::Verification(
            "Login state cookie is missing; start the login again".into(),
        )),
    }
}

#[async_trait]
impl IdentityProvider for GoogleSso {
    fn authorization_redirect(&self, params: &[(&str, &str)]) -> AuthorizationRedirect {
        let state = uuid::Uuid::new_v4().to_string();
        let url = self.authorization_url(&state, params);
        AuthorizationRedirect { url, state }
    }

    async fn verify_callback(
        &self,
        request: &CallbackRequest,
    ) -> Result<VerifiedIdentity, SsoError> {
        let code = check_callback_params(request)?;

        let tokens = self.exchange_code(code).await?;
        let user_info = self.fetch_user_info(&tokens.access_token).await?;

        let email = user_info.email.filter(|e| !e.is_empty()).ok_or_else(|| {
            SsoError::Verification("Google did not return an email address".into())
        })?;
        if user_info.email_verified != Some(true) {
            return Err(SsoError::Verification(format!(
                "User {} is not verified with Google",
                email
            )));
        }

        Ok(VerifiedIdentity {
            email,
            display_name: user_info.name,
            provider: SsoProvider::Google.as_str().to_string(),
        })
    }
}
