//! Sentra ownership API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

use sentra_application::{OwnershipAuditLogger, OwnershipService};
use sentra_core::AppError;
use sentra_infrastructure::{
    InMemoryOwnershipCache, InMemoryTemporaryGrantCache, PostgresOrganisationUnitRepository,
    PostgresOwnershipAuditRepository, PostgresOwnershipRepository,
    PostgresTemporaryGrantRepository, PostgresTrackerMetadataRepository, PostgresUserRepository,
    SystemClock,
};
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::api_config::ApiConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!()
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    if config.migrate_only {
        info!("migrations applied; exiting");
        return Ok(());
    }

    let user_repository = Arc::new(PostgresUserRepository::new(pool.clone()));
    let audit_logger =
        OwnershipAuditLogger::new(Arc::new(PostgresOwnershipAuditRepository::new(pool.clone())));

    // Both caches are constructed once here and shared across all requests.
    let ownership_service = OwnershipService::new(
        Arc::new(PostgresTrackerMetadataRepository::new(pool.clone())),
        Arc::new(PostgresOwnershipRepository::new(pool.clone())),
        Arc::new(InMemoryOwnershipCache::new()),
        Arc::new(PostgresTemporaryGrantRepository::new(pool.clone())),
        Arc::new(InMemoryTemporaryGrantCache::new()),
        Arc::new(PostgresOrganisationUnitRepository::new(pool)),
        audit_logger,
        Arc::new(SystemClock::new()),
        config.ownership,
    );

    let state = AppState {
        ownership_service,
        user_repository,
    };
    let router = api_router::build_router(state);

    let host = IpAddr::from_str(&config.api_host)
        .map_err(|error| AppError::Validation(format!("invalid API_HOST: {error}")))?;
    let address = SocketAddr::new(host, config.api_port);
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind {address}: {error}")))?;

    info!(%address, "sentra ownership api listening");

    axum::serve(listener, router)
        .await
        .map_err(|error| AppError::Internal(format!("server error: {error}")))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
