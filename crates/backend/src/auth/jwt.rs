//! JWT session token creation and validation.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use super::types::{AuthConfig, Claims};

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Failed to create session token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("Invalid or expired token")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

/// Mints and checks session tokens for a subject (the user's email).
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, subject: &str) -> Result<String, TokenError>;

    fn verify(&self, token: &str) -> Result<Claims, TokenError>;
}

/// HS256 tokens signed with the configured secret.
pub struct JwtIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_duration_days: i64,
}

impl JwtIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            token_duration_days: config.token_duration_days,
        }
    }
}

impl TokenIssuer for JwtIssuer {
    fn issue(&self, subject: &str) -> Result<String, TokenError> {
        let now = Utc::now();
        let exp = now + Duration::days(self.token_duration_days);

        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(TokenError::Signing)
    }

    fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(TokenError::Invalid)?;

        Ok(token_data.claims)
    }
}
