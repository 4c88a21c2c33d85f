pub mod config;
pub mod routes;
pub mod state;
pub mod storage;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Builds the full application router around `state`.
pub fn app(state: AppState) -> Router {
    routes::routes(state.clone())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
