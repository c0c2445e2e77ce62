use server::config;
use server::db;
use server::routes;

use std::sync::Arc;

use anyhow::Context;
use axum::{routing::{get, post}, Extension, Router};
use chess_puzzler::catalog::PuzzleCatalog;
use chess_puzzler::profile::{InMemoryProfileStore, ProfileStore};
use chess_puzzler::service::PuzzleService;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env();

    let profiles: Arc<dyn ProfileStore> = match &config.database_url {
        Some(url) => {
            tracing::info!("Connecting to database...");
            let pool = db::pool::create_pool(url)
                .await
                .context("Failed to connect to database")?;

            tracing::info!("Running migrations...");
            db::pool::run_migrations(&pool)
                .await
                .context("Failed to run migrations")?;

            Arc::new(db::profiles::PgProfileStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; profiles are kept in memory and lost on restart");
            Arc::new(InMemoryProfileStore::new())
        }
    };

    let catalog = Arc::new(PuzzleCatalog::load(&config.puzzles_path));
    let service = Arc::new(PuzzleService::new(catalog, profiles));

    // Idle session sweep
    if let Some(ttl) = config.session_idle_ttl {
        tokio::spawn({
            let service = service.clone();
            let every = config.eviction_interval;
            async move {
                let mut ticker = tokio::time::interval(every);
                loop {
                    ticker.tick().await;
                    let evicted = service.evict_idle(ttl).await;
                    if evicted > 0 {
                        tracing::info!("Evicted {} idle puzzle sessions", evicted);
                    }
                }
            }
        });
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        // Users
        .route("/api/users/register", post(routes::users::register))
        .route("/api/users/me", get(routes::users::me))
        // Puzzles
        .route("/api/puzzles/stats", get(routes::puzzles::get_puzzle_stats))
        .route("/api/puzzles/session", post(routes::puzzles::start_session))
        .route("/api/puzzles/session/move", post(routes::puzzles::submit_move))
        .route("/api/puzzles/session/reset", post(routes::puzzles::reset_session))
        .route("/api/puzzles/session/board", post(routes::puzzles::toggle_board))
        // Shared state
        .layer(Extension(service))
        .layer(CompressionLayer::new())
        .layer(cors);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
