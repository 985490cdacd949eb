use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User struct matching database column order exactly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "diesel", derive(diesel::Queryable))]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub provider: String, // stored as VARCHAR: "google"
    pub created_at: DateTime<Utc>,
}

/// Input for registering a user after their first successful SSO login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub full_name: Option<String>,
    pub provider: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SsoProvider {
    Google,
}

impl SsoProvider {
    pub fn as_str(&self) -> &str {
        match self {
            SsoProvider::Google => "google",
        }
    }
}

// API Request/Response types for the signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUserResponse {
    pub email: String,
    pub full_name: Option<String>,
    pub provider: String,
}

impl From<User> for AuthUserResponse {
    fn from(user: User) -> Self {
        AuthUserResponse {
            email: user.email,
            full_name: user.full_name,
            provider: user.provider,
        }
    }
}
