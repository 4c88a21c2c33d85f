use axum::{ Json, extract::State, http::StatusCode };
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthData {
    pub status: u16,
}

/// Reports whether the storage backend still answers a round trip.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthData>) {
    let status = match state.db.ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!("storage ping failed: {}", e);
            StatusCode::SERVICE_UNAVAILABLE
        }
    };

    (status, Json(HealthData { status: status.as_u16() }))
}

pub async fn greet() -> &'static str {
    "Hello, World!!"
}
