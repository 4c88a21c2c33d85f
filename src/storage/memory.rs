use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::StoreError;
use crate::routes::todos::model::Todo;
use crate::routes::users::User;

/// Process-local backend. Everything is lost when the process exits.
#[derive(Default)]
pub struct MemoryStore {
    todos: RwLock<TodoTable>,
    users: RwLock<HashMap<Uuid, User>>,
}

#[derive(Default)]
struct TodoTable {
    last_id: i64,
    rows: Vec<Todo>,
}

impl MemoryStore {
    pub async fn insert_todo(&self, task: &str, completed: bool) -> Todo {
        let mut table = self.todos.write().await;
        table.last_id += 1;

        let now = Utc::now();
        let todo = Todo {
            id: table.last_id,
            task: task.to_string(),
            completed,
            created_at: now,
            updated_at: now,
        };
        table.rows.push(todo.clone());
        todo
    }

    /// Newest first, matching `ORDER BY created_at DESC, id DESC`.
    pub async fn list_todos(&self) -> Vec<Todo> {
        let table = self.todos.read().await;
        table.rows.iter().rev().cloned().collect()
    }

    pub async fn insert_user(
        &self,
        id: Uuid,
        username: &str,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == username) {
            return Err(StoreError::Conflict);
        }

        let now = Utc::now();
        let user = User {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        users.insert(id, user.clone());
        Ok(user)
    }

    pub async fn user_by_id(&self, id: Uuid) -> Option<User> {
        self.users.read().await.get(&id).cloned()
    }

    pub async fn user_by_username(&self, username: &str) -> Option<User> {
        self.users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned()
    }

    pub async fn update_user(
        &self,
        id: Uuid,
        username: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<Option<User>, StoreError> {
        let mut users = self.users.write().await;

        // a missing row wins over a name clash, as with `UPDATE ... WHERE id`
        if !users.contains_key(&id) {
            return Ok(None);
        }
        if let Some(name) = username {
            if users.values().any(|u| u.username == name && u.id != id) {
                return Err(StoreError::Conflict);
            }
        }

        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = username {
            user.username = name.to_string();
        }
        if let Some(hash) = password_hash {
            user.password_hash = hash.to_string();
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    pub async fn delete_user(&self, id: Uuid) -> bool {
        self.users.write().await.remove(&id).is_some()
    }
}
