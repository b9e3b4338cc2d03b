//! Yanote API Server
//!
//! A personal notes service: every note belongs to its author and is only
//! visible to them. Uses hexagonal (ports & adapters) architecture for clean
//! separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use sea_orm::Database;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod auth;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;
mod routes;

#[cfg(test)]
mod test_utils;


use adapters::{PostgresNoteRepository, PostgresSessionRepository, PostgresUserRepository};
use app::{NoteService, UserService};
use config::Config;
use domain::ports::{NoteRepository, SessionRepository, UserRepository};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub note_service: Arc<NoteService<dyn NoteRepository>>,
    pub user_service: Arc<UserService<dyn UserRepository, dyn SessionRepository>>,
    pub config: Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,yanote_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Yanote API...");

    let config = Config::from_env()?;

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Create adapters
    let note_repo: Arc<dyn NoteRepository> = Arc::new(PostgresNoteRepository::new(db.clone()));
    let user_repo: Arc<dyn UserRepository> = Arc::new(PostgresUserRepository::new(db.clone()));
    let session_repo: Arc<dyn SessionRepository> =
        Arc::new(PostgresSessionRepository::new(db.clone()));

    // Create application services
    let note_service = Arc::new(NoteService::new(note_repo));
    let user_service = Arc::new(UserService::new(
        user_repo,
        session_repo,
        config.secret_key.clone(),
        chrono::Duration::hours(config.session_ttl_hours),
    ));

    let state = AppState {
        note_service,
        user_service,
        config: config.clone(),
    };

    // Rate limiting is off when AUTH_RATE_PER_SECOND is 0
    let app = if config.auth_rate_per_second == 0 {
        tracing::warn!("Rate limiting on account pages is disabled");
        routes::build_router(state)
    } else {
        routes::build_rate_limited_router(state)?
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
