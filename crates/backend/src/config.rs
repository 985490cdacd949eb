//! Process-wide configuration, loaded once at startup.
//!
//! Values come from command-line flags with environment-variable fallbacks
//! (a `.env` file is read first by `main`). The resulting [`AppConfig`] is
//! passed explicitly into the components that need it.

use std::net::SocketAddr;

use clap::{builder::BoolishValueParser, ArgAction, Parser};
use thiserror::Error;

use crate::auth::google::GoogleConfig;
use crate::auth::types::AuthConfig;
use crate::API_PREFIX;

#[derive(Parser, Clone)]
#[command(name = "sso-backend")]
#[command(about = "Login with Google: OAuth2 redirect flow issuing session cookies")]
pub struct ServerArgs {
    /// Address the HTTP server listens on.
    #[arg(long, default_value = "0.0.0.0:9999", env = "BIND_ADDR")]
    pub bind: SocketAddr,

    /// Externally visible base URL of this service.
    ///
    /// The Google callback URL is derived from it as
    /// `<public-url>/v1/google/callback` and must be registered with Google.
    #[arg(long, default_value = "http://localhost:9999", env = "PUBLIC_URL")]
    pub public_url: String,

    #[arg(long, env = "GOOGLE_CLIENT_ID", hide_env_values = true)]
    pub google_client_id: String,

    #[arg(long, env = "GOOGLE_CLIENT_SECRET", hide_env_values = true)]
    pub google_client_secret: String,

    /// Secret key for signing session tokens.
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Lifetime of issued session tokens and cookies.
    #[arg(long, default_value_t = 7, env = "TOKEN_DURATION_DAYS")]
    pub token_duration_days: i64,

    /// Postgres connection string. Users are kept in memory when unset.
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Connect to Postgres over TLS using the webpki root store.
    #[arg(
        long,
        env = "DATABASE_TLS",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        default_value = "false"
    )]
    pub database_tls: bool,

    /// Allow the OAuth callback and cookies over plain HTTP (development only).
    #[arg(
        long,
        env = "OAUTH_ALLOW_INSECURE_HTTP",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        default_value = "false"
    )]
    pub allow_insecure_http: bool,

    /// Comma-separated list of origins allowed by CORS.
    #[arg(long, env = "CORS_ALLOWED_ORIGINS", value_delimiter = ',')]
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    #[error("PUBLIC_URL must start with http:// or https://, got {0}")]
    InvalidPublicUrl(String),

    #[error(
        "callback URL {0} uses plain HTTP; set OAUTH_ALLOW_INSECURE_HTTP=true to allow it in development"
    )]
    InsecureCallback(String),

    #[error("TOKEN_DURATION_DAYS must be positive, got {0}")]
    InvalidTokenDuration(i64),
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub tls: bool,
}

/// Validated configuration for the whole process.
#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub google: GoogleConfig,
    pub auth: AuthConfig,
    pub database: Option<DatabaseConfig>,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    /// Parse flags and environment, then validate.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_args(ServerArgs::parse())
    }

    pub fn from_args(args: ServerArgs) -> Result<Self, ConfigError> {
        if args.google_client_id.trim().is_empty() {
            return Err(ConfigError::Empty("GOOGLE_CLIENT_ID"));
        }
        if args.google_client_secret.trim().is_empty() {
            return Err(ConfigError::Empty("GOOGLE_CLIENT_SECRET"));
        }
        if args.jwt_secret.is_empty() {
            return Err(ConfigError::Empty("JWT_SECRET"));
        }
        if args.token_duration_days <= 0 {
            return Err(ConfigError::InvalidTokenDuration(args.token_duration_days));
        }

        let redirect_uri = callback_url(&args.public_url)?;
        if redirect_uri.starts_with("http://") {
            if !args.allow_insecure_http {
                return Err(ConfigError::InsecureCallback(redirect_uri));
            }
            tracing::warn!(
                "Insecure HTTP transport allowed for OAuth callback {} (development only)",
                redirect_uri
            );
        }

        let database = args
            .database_url
            .filter(|url| !url.trim().is_empty())
            .map(|url| DatabaseConfig {
                url,
                tls: args.database_tls,
            });

        Ok(Self {
            bind_addr: args.bind,
            google: GoogleConfig {
                client_id: args.google_client_id,
                client_secret: args.google_client_secret,
                redirect_uri,
            },
            auth: AuthConfig {
                jwt_secret: args.jwt_secret,
                token_duration_days: args.token_duration_days,
                secure_cookies: !args.allow_insecure_http,
            },
            database,
            cors_allowed_origins: args
                .cors_allowed_origins
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        })
    }
}

/// Build the provider callback URL from the public base URL.
pub fn callback_url(public_url: &str) -> Result<String, ConfigError> {
    let base = public_url.trim().trim_end_matches('/');
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        return Err(ConfigError::InvalidPublicUrl(public_url.to_string()));
    }
    Ok(format!("{}{}/callback", base, API_PREFIX))
}
