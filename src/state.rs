use std::sync::Arc;

use crate::config::Config;
use crate::routes::auth::TokenKeys;
use crate::storage::Storage;

#[derive(Clone)]
pub struct AppState {
    pub db: Storage,
    pub tokens: Arc<TokenKeys>,
}

impl AppState {
    pub fn new(db: Storage, tokens: TokenKeys) -> Self {
        Self {
            db,
            tokens: Arc::new(tokens),
        }
    }

    pub fn from_config(db: Storage, config: &Config) -> Self {
        Self::new(db, TokenKeys::new(&config.jwt_secret, config.jwt_ttl))
    }
}
