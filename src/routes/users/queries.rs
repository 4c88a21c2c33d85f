use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

use super::User;
use crate::storage::{Storage, StoreError};

const USER_COLUMNS: &str = "id, username, password_hash, created_at, updated_at";

pub fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        password_hash: row.try_get("password_hash")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub async fn create_user(
    db: &Storage,
    id: Uuid,
    username: &str,
    password_hash: &str,
) -> Result<User, StoreError> {
    match db {
        Storage::Postgres(pool) => {
            let query = format!(
                r#"
                INSERT INTO users (id, username, password_hash)
                VALUES ($1, $2, $3)
                RETURNING {}
                "#,
                USER_COLUMNS
            );
            let row = sqlx::query(&query)
                .bind(id)
                .bind(username)
                .bind(password_hash)
                .fetch_one(pool)
                .await?;

            Ok(user_from_row(&row)?)
        }
        Storage::Memory(store) => store.insert_user(id, username, password_hash).await,
    }
}

pub async fn find_by_username(db: &Storage, username: &str) -> Result<Option<User>, StoreError> {
    match db {
        Storage::Postgres(pool) => {
            let query = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
            let row = sqlx::query(&query)
                .bind(username)
                .fetch_optional(pool)
                .await?;

            Ok(row.as_ref().map(user_from_row).transpose()?)
        }
        Storage::Memory(store) => Ok(store.user_by_username(username).await),
    }
}

pub async fn get_user(db: &Storage, id: Uuid) -> Result<Option<User>, StoreError> {
    match db {
        Storage::Postgres(pool) => {
            let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
            let row = sqlx::query(&query).bind(id).fetch_optional(pool).await?;

            Ok(row.as_ref().map(user_from_row).transpose()?)
        }
        Storage::Memory(store) => Ok(store.user_by_id(id).await),
    }
}

/// Replaces whichever fields are `Some`; `None` when the user does not exist.
pub async fn update_user(
    db: &Storage,
    id: Uuid,
    username: Option<&str>,
    password_hash: Option<&str>,
) -> Result<Option<User>, StoreError> {
    match db {
        Storage::Postgres(pool) => {
            let query = format!(
                r#"
                UPDATE users
                SET
                    username = COALESCE($2, username),
                    password_hash = COALESCE($3, password_hash),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING {}
                "#,
                USER_COLUMNS
            );
            let row = sqlx::query(&query)
                .bind(id)
                .bind(username)
                .bind(password_hash)
                .fetch_optional(pool)
                .await?;

            Ok(row.as_ref().map(user_from_row).transpose()?)
        }
        Storage::Memory(store) => store.update_user(id, username, password_hash).await,
    }
}

/// Returns whether a row was removed.
pub async fn delete_user(db: &Storage, id: Uuid) -> Result<bool, StoreError> {
    match db {
        Storage::Postgres(pool) => {
            let result = sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(id)
                .execute(pool)
                .await?;

            Ok(result.rows_affected() > 0)
        }
        Storage::Memory(store) => Ok(store.delete_user(id).await),
    }
}
