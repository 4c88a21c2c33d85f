use sqlx::postgres::PgRow;
use sqlx::Row;

use super::model::Todo;
use crate::storage::{Storage, StoreError};

const TODO_COLUMNS: &str = "id, task, completed, created_at, updated_at";

/// Maps one `todos` row, by column name, onto a [`Todo`].
pub fn todo_from_row(row: &PgRow) -> Result<Todo, sqlx::Error> {
    Ok(Todo {
        id: row.try_get("id")?,
        task: row.try_get("task")?,
        completed: row.try_get("completed")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub async fn create_todo(db: &Storage, task: &str, completed: bool) -> Result<Todo, StoreError> {
    match db {
        Storage::Postgres(pool) => {
            let query = format!(
                "INSERT INTO todos (task, completed) VALUES ($1, $2) RETURNING {}",
                TODO_COLUMNS
            );
            let row = sqlx::query(&query)
                .bind(task)
                .bind(completed)
                .fetch_one(pool)
                .await?;

            Ok(todo_from_row(&row)?)
        }
        Storage::Memory(store) => Ok(store.insert_todo(task, completed).await),
    }
}

pub async fn list_todos(db: &Storage) -> Result<Vec<Todo>, StoreError> {
    match db {
        Storage::Postgres(pool) => {
            let query = format!(
                "SELECT {} FROM todos ORDER BY created_at DESC, id DESC",
                TODO_COLUMNS
            );
            let rows = sqlx::query(&query).fetch_all(pool).await?;

            let todos = rows
                .iter()
                .map(todo_from_row)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(todos)
        }
        Storage::Memory(store) => Ok(store.list_todos().await),
    }
}
