use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub mod auth;
pub mod health;
pub mod middleware_auth;
pub mod todos;
pub mod users;

pub use health::{greet, health};

use crate::state::AppState;

/// Body of every 500; the underlying error only goes to the log.
pub const SERVER_ERROR: &str = "Something bad happened on the server :(";

pub fn routes(state: AppState) -> Router<AppState> {
    // served with and without the trailing slash
    let todo_routes = get(todos::routes::list).post(todos::routes::create);

    let user_router = Router::new()
        .route(
            "/{id}",
            get(users::routes::get)
                .post(users::routes::update)
                .delete(users::routes::delete),
        )
        .route_layer(middleware::from_fn_with_state(
            state,
            middleware_auth::require_auth,
        ))
        .route("/login", post(users::routes::login))
        .route("/signup", post(users::routes::signup));

    Router::new()
        .route("/greet", get(greet))
        .route("/health", get(health))
        .route("/todos", todo_routes.clone())
        .route("/todos/", todo_routes)
        .nest("/user", user_router)
}
