//! User store abstraction.
//!
//! The login flow only needs two operations on users: look one up by email
//! and register a new one. Uniqueness of email is the store's job; a store
//! that loses a creation race reports [`UserStoreError::Duplicate`] instead of
//! writing a second record.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use shared_types::{NewUser, User};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum UserStoreError {
    /// A user with this email already exists
    #[error("{0}")]
    Duplicate(String),

    /// Store unreachable or query failed
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl UserStoreError {
    pub fn duplicate(email: &str) -> Self {
        UserStoreError::Duplicate(format!("User with email {} already exists", email))
    }
}

pub type StoreResult<T> = Result<T, UserStoreError>;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by exact email.
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Register a new user, failing with `Duplicate` if the email is taken.
    async fn create(&self, user: NewUser) -> StoreResult<User>;
}

/// Process-local user store, used when no database is configured.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn create(&self, user: NewUser) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.email) {
            return Err(UserStoreError::duplicate(&user.email));
        }

        let created = User {
            id: Uuid::new_v4(),
            email: user.email,
            full_name: user.full_name,
            provider: user.provider,
            created_at: Utc::now(),
        };
        users.insert(created.email.clone(), created.clone());

        Ok(created)
    }
}
