//! Shared application state
//!
//! Immutable after startup; cloned into every handler.

use std::sync::Arc;

use crate::auth::SharedSecret;
use crate::config::{DEFAULT_MAX_BODY_BYTES, ServerConfig};
use crate::storage::ArchiveStore;

#[derive(Debug, Clone)]
pub struct AppState {
    store: Arc<ArchiveStore>,
    secret: Arc<SharedSecret>,
    body_limit: usize,
}

impl AppState {
    pub fn new(store: ArchiveStore, secret: SharedSecret) -> Self {
        Self {
            store: Arc::new(store),
            secret: Arc::new(secret),
            body_limit: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            ArchiveStore::new(config.data_dir_path()),
            SharedSecret::new(config.password.clone()),
        )
        .with_body_limit(config.max_body_bytes)
    }

    /// Replace the request body cap, in bytes.
    pub fn with_body_limit(mut self, bytes: usize) -> Self {
        self.body_limit = bytes;
        self
    }

    pub fn store(&self) -> &ArchiveStore {
        &self.store
    }

    pub fn secret(&self) -> &SharedSecret {
        &self.secret
    }

    pub fn body_limit(&self) -> usize {
        self.body_limit
    }
}
