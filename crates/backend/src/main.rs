use std::sync::Arc;

use axum::http::{header, Method};
use backend::{
    build_router,
    config::AppConfig,
    db::{self, PgUserStore},
    repository::{InMemoryUserStore, UserStore},
    AppState,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;

    let users: Arc<dyn UserStore> = match &config.database {
        Some(database) => {
            let pool = db::establish_connection_pool(database)?;
            tracing::info!("Using Postgres user store (tls: {})", database.tls);
            Arc::new(PgUserStore::new(pool))
        }
        None => {
            tracing::warn!(
                "DATABASE_URL not set, keeping users in memory (lost on restart)"
            );
            Arc::new(InMemoryUserStore::new())
        }
    };

    let state = AppState::from_config(&config, users)?;
    let app = build_router(state)
        .layer(build_cors_layer(&config.cors_allowed_origins))
        .layer(TraceLayer::new_for_http());

    tracing::info!("Google callback URL: {}", config.google.redirect_uri);
    tracing::info!("Server listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build CORS layer from the configured origins.
///
/// With no origins configured, cross-origin requests are not allowed.
fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<_> = allowed_origins
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();

    if origins.is_empty() {
        tracing::info!("CORS_ALLOWED_ORIGINS not set, cross-origin requests disabled");
        return CorsLayer::new();
    }

    tracing::info!("CORS configured for origins: {:?}", origins);
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
