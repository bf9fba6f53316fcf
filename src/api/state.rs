//! Application state for the payroll import API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::ingest::{Importer, MemoryStore};

/// Shared application state.
///
/// Holds the compiled ingestion configuration and the record store every
/// import writes into.
#[derive(Clone)]
pub struct AppState {
    /// The compiled ingestion configuration.
    config: Arc<ConfigLoader>,
    /// Where imported records are stored.
    store: Arc<MemoryStore>,
}

impl AppState {
    /// Creates a new application state with an empty store.
    pub fn new(config: ConfigLoader) -> Self {
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }

    /// Creates a new application state writing into an existing store.
    pub fn with_store(config: ConfigLoader, store: Arc<MemoryStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the record store.
    pub fn store(&self) -> &Arc<MemoryStore> {
        &self.store
    }

    /// Creates an importer sharing this state's configuration.
    pub fn importer(&self) -> Importer {
        Importer::new(Arc::clone(&self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone + Send + Sync>() {}
        assert_clone::<AppState>();
    }

    #[tokio::test]
    async fn test_clones_share_the_store() {
        let state = AppState::new(ConfigLoader::builtin().unwrap());
        let clone = state.clone();
        assert!(Arc::ptr_eq(state.store(), clone.store()));
        assert!(clone.store().is_empty().await);
    }
}
