mod config;

use std::sync::Arc;

use clap::Parser;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use chirpy_api::{AppState, AppStateInner};
use chirpy_auth::TokenService;
use chirpy_db::Database;

use crate::config::Config;

#[derive(Debug, Parser)]
#[command(name = "chirpy", about = "Chirpy social posting server")]
struct Args {
    /// Delete the database and start from an empty one.
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chirpy=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    // Init database
    let db = if args.debug {
        warn!("--debug: resetting database at {}", config.db_path.display());
        Database::create(&config.db_path)?
    } else {
        Database::open(&config.db_path)?
    };

    let state: AppState = Arc::new(AppStateInner::new(
        db,
        TokenService::new(&config.jwt_secret),
        config.polka_key,
    ));

    let app = chirpy_api::router(state, &config.static_root)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    info!("Serving files from {}", config.static_root.display());
    info!("Chirpy server listening on {}", config.addr);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Received Ctrl+C, shutting down...");
    }
}
