use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use super::{
    queries, validate_password, validate_username, CredentialsRequest, LoginResponse,
    UpdateUserRequest, UserResponse,
};
use crate::routes::auth::{hash_password, verify_password};
use crate::routes::middleware_auth::AuthUser;
use crate::routes::SERVER_ERROR;
use crate::state::AppState;
use crate::storage::StoreError;

type HandlerError = (StatusCode, String);

fn bad_request(payload: Result<(), String>) -> Result<(), HandlerError> {
    payload.map_err(|e| (StatusCode::BAD_REQUEST, e))
}

fn internal<E: std::fmt::Display>(context: &'static str) -> impl FnOnce(E) -> HandlerError {
    move |e| {
        tracing::error!("{}: {}", context, e);
        (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR.to_string())
    }
}

fn store_error(context: &'static str) -> impl FnOnce(StoreError) -> HandlerError {
    move |e| match e {
        StoreError::Conflict => (StatusCode::CONFLICT, "username already taken".to_string()),
        other => internal(context)(other),
    }
}

fn decode<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, HandlerError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::debug!("rejected user body: {}", rejection);
        (StatusCode::BAD_REQUEST, "invalid payload".to_string())
    })
}

// A token only grants access to its own user.
fn ensure_self(auth: AuthUser, id: Uuid) -> Result<(), HandlerError> {
    if auth.0 != id {
        return Err((StatusCode::FORBIDDEN, "forbidden".to_string()));
    }
    Ok(())
}

/// Sign up a new user
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let payload = decode(payload)?;
    bad_request(validate_username(&payload.username))?;
    bad_request(validate_password(&payload.password))?;

    let password_hash =
        hash_password(&payload.password).map_err(internal("Failed to hash password"))?;

    let user = queries::create_user(&state.db, Uuid::new_v4(), &payload.username, &password_hash)
        .await
        .map_err(store_error("Failed to create user"))?;

    tracing::info!(user_id = %user.id, "user signed up");
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Check credentials and hand out a bearer token
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let payload = decode(payload)?;

    let invalid = || (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string());

    let user = queries::find_by_username(&state.db, &payload.username)
        .await
        .map_err(store_error("Failed to look up user"))?
        .ok_or_else(invalid)?;

    let verified = verify_password(&payload.password, &user.password_hash)
        .map_err(internal("Stored password hash is unreadable"))?;
    if !verified {
        return Err(invalid());
    }

    let token = state
        .tokens
        .issue(user.id)
        .map_err(internal("Failed to issue token"))?;

    Ok(Json(LoginResponse { token }))
}

/// Get a single user by ID
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HandlerError> {
    ensure_self(auth, id)?;

    let user = queries::get_user(&state.db, id)
        .await
        .map_err(store_error("Failed to fetch user"))?;

    match user {
        Some(u) => Ok(Json(UserResponse::from(u))),
        None => Err((StatusCode::NOT_FOUND, "User not found".to_string())),
    }
}

/// Update username and/or password
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    ensure_self(auth, id)?;
    let payload = decode(payload)?;

    if let Some(username) = &payload.username {
        bad_request(validate_username(username))?;
    }
    let password_hash = match &payload.password {
        Some(password) => {
            bad_request(validate_password(password))?;
            Some(hash_password(password).map_err(internal("Failed to hash password"))?)
        }
        None => None,
    };

    let user = queries::update_user(
        &state.db,
        id,
        payload.username.as_deref(),
        password_hash.as_deref(),
    )
    .await
    .map_err(store_error("Failed to update user"))?;

    match user {
        Some(u) => Ok(Json(UserResponse::from(u))),
        None => Err((StatusCode::NOT_FOUND, "User not found".to_string())),
    }
}

/// Delete a user
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HandlerError> {
    ensure_self(auth, id)?;

    let removed = queries::delete_user(&state.db, id)
        .await
        .map_err(store_error("Failed to delete user"))?;

    if !removed {
        return Err((StatusCode::NOT_FOUND, "User not found".to_string()));
    }

    tracing::info!(user_id = %id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
