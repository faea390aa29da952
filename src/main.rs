#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
// easier to use when using the functions as callback of foreign functions
#![allow(clippy::needless_pass_by_value)]

use anyhow::Result;
use axum::Extension;
use axum::Router;
use axum::http::Method;
use axum::http::header::ACCEPT;
use axum::http::header::AUTHORIZATION;
use axum::http::header::CONTENT_TYPE;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::cors::AllowOrigin;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::prelude::*;

use crate::api::JwtKeys;
use crate::api::router;
use crate::config::Config;
use crate::database::Database;
use crate::database::DatabaseConfig;
use crate::health::Uptime;
use crate::place_search::PlaceSearch;

mod api;
mod budgets;
mod config;
mod database;
mod graceful_shutdown;
mod health;
mod itineraries;
mod memos;
mod password;
mod place_search;
mod pois;
mod root;
#[cfg(test)]
mod tests;
mod users;
mod utils;

const DEFAULT_RUST_LOG: &str = "tripmaster=debug,tower_http=debug";

#[tokio::main]
async fn main() -> Result<()> {
    setup_environment();
    setup_tracing();

    let config = Config::from_env()?;

    let database = Database::from_config(DatabaseConfig::DetectConfig).await?;

    let app = create_router(&config, database.clone())?;

    let listener = TcpListener::bind(config.address).await?;
    tracing::info!("Listening on {}", config.address);

    axum::serve(listener, app)
        .with_graceful_shutdown(graceful_shutdown::handler())
        .await?;

    database.close().await;
    tracing::info!("Database connections closed");

    Ok(())
}

/// Create the router for TripMaster
///
/// # Errors
///
/// Will return `Err` when the HTTP client for place search can not be set up
pub fn create_router(config: &Config, database: Database) -> Result<Router> {
    let jwt_keys = JwtKeys::new(config.jwt_secret.as_bytes(), config.enforce_token_expiry);
    let place_search = PlaceSearch::new(config.place_search.clone())?;

    Ok(Router::new()
        .route("/", get(root::root))
        .route("/health", get(health::health))
        .nest("/api", router())
        .layer(TraceLayer::new_for_http())
        .layer(Extension(database))
        .layer(Extension(jwt_keys))
        .layer(Extension(place_search))
        .layer(Extension(Uptime::start()))
        .layer(cors_layer(config)))
}

/// Browsers may call the API from the configured origins, or from anywhere when none are set
fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(config.cors_origins.clone()))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT])
}

fn setup_environment() {
    dotenvy::dotenv().ok();
}

fn setup_tracing() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::registry;

    registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_RUST_LOG.into()),
        ))
        .with(fmt::layer())
        .init();
}
