use std::process;

use todo_api::config::Config;
use todo_api::storage::Storage;
use todo_api::{app, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("todo_api=info,tower_http=info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Couldn't load config on startup: {}", e);
            process::exit(1);
        }
    };

    let db = match Storage::connect(&config).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Error connecting DB: {}", e);
            process::exit(1);
        }
    };
    tracing::info!(driver = ?db.driver(), "connected to DB");

    let state = AppState::from_config(db, &config);

    let listener = match tokio::net::TcpListener::bind(config.addr()).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Couldn't bind {}: {}", config.addr(), e);
            process::exit(1);
        }
    };

    tracing::info!("server running on http://{}", config.addr());

    if let Err(e) = axum::serve(listener, app(state)).await {
        tracing::error!("server error: {}", e);
        process::exit(1);
    }
}
