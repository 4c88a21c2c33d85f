use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::dto::AddTodo;
use super::queries;
use crate::routes::SERVER_ERROR;
use crate::state::AppState;

pub const TODO_ADDED: &str = "Todo added!!";
pub const BAD_TODO: &str = "Please enter a correct Todo!!";

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<AddTodo>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match payload {
        Ok(body) => body,
        Err(rejection) => {
            tracing::debug!("rejected todo body: {}", rejection);
            return (StatusCode::BAD_REQUEST, BAD_TODO).into_response();
        }
    };

    match queries::create_todo(&state.db, &body.task, body.completed).await {
        Ok(todo) => {
            tracing::info!(id = todo.id, "todo added");
            (StatusCode::OK, TODO_ADDED).into_response()
        }
        Err(e) => {
            tracing::error!("Error creating todo: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR).into_response()
        }
    }
}

pub async fn list(State(state): State<AppState>) -> impl IntoResponse {
    match queries::list_todos(&state.db).await {
        Ok(todos) => (StatusCode::OK, Json(todos)).into_response(),
        Err(e) => {
            tracing::error!("Error listing todos: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR).into_response()
        }
    }
}
