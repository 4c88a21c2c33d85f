use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::{Config, DbDriver};

mod memory;

pub use memory::MemoryStore;

/// Shared handle to whichever backend holds todos and users.
///
/// Cloning is cheap: the pool and the in-memory store are both reference counted.
#[derive(Clone)]
pub enum Storage {
    Postgres(PgPool),
    Memory(Arc<MemoryStore>),
}

#[derive(Debug)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    Conflict,
    Database(sqlx::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Conflict => write!(f, "unique constraint violated"),
            StoreError::Database(e) => write!(f, "database error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Conflict => None,
            StoreError::Database(e) => Some(e),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db_error) = e.as_database_error() {
            if db_error.code() == Some(Cow::Borrowed("23505")) {
                return StoreError::Conflict;
            }
        }
        StoreError::Database(e)
    }
}

impl Storage {
    /// Opens the configured backend and checks that it answers.
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let storage = match config.db_driver {
            DbDriver::Memory => Storage::memory(),
            DbDriver::Postgres => {
                let url = config.database_url.as_deref().unwrap_or_default();
                let pool = PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .connect(url)
                    .await?;
                Storage::Postgres(pool)
            }
        };

        storage.ping().await?;
        Ok(storage)
    }

    pub fn memory() -> Self {
        Storage::Memory(Arc::new(MemoryStore::default()))
    }

    /// Round-trip check against the backend.
    pub async fn ping(&self) -> Result<(), StoreError> {
        match self {
            Storage::Postgres(pool) => {
                sqlx::query("SELECT 1").execute(pool).await?;
                Ok(())
            }
            Storage::Memory(_) => Ok(()),
        }
    }

    pub fn driver(&self) -> DbDriver {
        match self {
            Storage::Postgres(_) => DbDriver::Postgres,
            Storage::Memory(_) => DbDriver::Memory,
        }
    }
}
