use anyhow::Context;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::{
    pooled_connection::{deadpool::Pool, AsyncDieselConnectionManager, ManagerConfig},
    AsyncPgConnection, RunQueryDsl,
};
use shared_types::{NewUser, User};

use crate::config::DatabaseConfig;
use crate::models::NewUserRow;
use crate::repository::{StoreResult, UserStore, UserStoreError};

pub type DbPool = Pool<AsyncPgConnection>;

async fn establish_tls_connection(config: String) -> diesel::ConnectionResult<AsyncPgConnection> {
    // Set up rustls TLS configuration
    let root_store =
        rustls::RootCertStore::from_iter(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    let tls_config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();
    let tls = tokio_postgres_rustls::MakeRustlsConnect::new(tls_config);

    let (client, connection) = tokio_postgres::connect(&config, tls)
        .await
        .map_err(|e| diesel::ConnectionError::BadConnection(e.to_string()))?;

    // The connection future drives the socket; it must run for the client to work
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::error!("Connection error: {}", e);
        }
    });

    AsyncPgConnection::try_from(client).await
}

pub fn establish_connection_pool(database: &DatabaseConfig) -> anyhow::Result<DbPool> {
    let manager = if database.tls {
        let mut manager_config = ManagerConfig::default();
        manager_config.custom_setup =
            Box::new(|url| Box::pin(establish_tls_connection(url.to_string())));
        AsyncDieselConnectionManager::<AsyncPgConnection>::new_with_config(
            database.url.clone(),
            manager_config,
        )
    } else {
        AsyncDieselConnectionManager::<AsyncPgConnection>::new(database.url.clone())
    };

    let pool = Pool::builder(manager)
        .build()
        .context("Failed to build database connection pool")?;

    Ok(pool)
}

// User database operations
pub mod users {
    use super::*;

    pub async fn get_by_email(
        conn: &mut AsyncPgConnection,
        email_addr: &str,
    ) -> QueryResult<Option<User>> {
        use crate::schema::users::dsl::*;

        users
            .filter(email.eq(email_addr))
            .first::<User>(conn)
            .await
            .optional()
    }

    /// Insert a user. Fails with a `UniqueViolation` if the email is taken.
    pub async fn create(conn: &mut AsyncPgConnection, new_user: &NewUser) -> QueryResult<User> {
        use crate::schema::users::dsl::*;

        diesel::insert_into(users)
            .values(NewUserRow::from(new_user))
            .get_result::<User>(conn)
            .await
    }
}

/// Postgres-backed user store. Email uniqueness comes from the
/// `users_email_key` constraint.
#[derive(Clone)]
pub struct PgUserStore {
    pool: DbPool,
}

impl PgUserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let mut conn = self
            .pool
            .get()
            .await
            .context("Database connection unavailable")?;

        let user = users::get_by_email(&mut conn, email)
            .await
            .context("Failed to look up user")?;

        Ok(user)
    }

    async fn create(&self, user: NewUser) -> StoreResult<User> {
        let mut conn = self
            .pool
            .get()
            .await
            .context("Database connection unavailable")?;

        match users::create(&mut conn, &user).await {
            Ok(created) => {
                tracing::info!("Created user {} (provider: {})", created.email, created.provider);
                Ok(created)
            }
            Err(e) => Err(classify_insert_error(&user.email, e)),
        }
    }
}

fn classify_insert_error(email: &str, err: DieselError) -> UserStoreError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            UserStoreError::duplicate(email)
        }
        other => UserStoreError::Backend(anyhow::Error::new(other).context("Failed to create user")),
    }
}
