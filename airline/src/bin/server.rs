//! Airline booking server.
//!
//! Loads configuration, opens the database, applies migrations and serves
//! the REST API until interrupted.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin server
//! ```

use airline::{AppState, Config, build_router, db};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,airline=debug,tower_http=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting airline booking server...");

    let config = Config::from_env();
    tracing::info!(
        database = %config.database.url,
        media_root = %config.media.root.display(),
        "Configuration loaded"
    );

    let pool = db::connect(&config.database).await?;
    db::migrate(&pool).await?;
    tracing::info!("Migrations applied");

    let addr = config.bind_addr();
    let state = AppState::new(pool, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "Failed to install ctrl-c handler");
    }
}
