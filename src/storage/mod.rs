//! Record store abstraction
//!
//! The controller only talks to [`ShortcodeStore`]; the bundled backends
//! exist so the service runs without external infrastructure.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::StaticConfig;
use crate::errors::{Result, ShortcoderError};

pub mod file;
pub mod memory;
pub mod models;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use models::{Shortcode, normalize_name};

/// Persistence contract for shortcode records. Every operation is atomic
/// for a single record; names are passed already normalized.
#[async_trait]
pub trait ShortcodeStore: Send + Sync {
    async fn get(&self, name: &str) -> Result<Option<Shortcode>>;

    /// Exact-match lookup on `destination`, ordered by name.
    async fn find_by_destination(&self, destination: &str) -> Result<Vec<Shortcode>>;

    /// Write-if-absent. Fails with [`ShortcoderError::Conflict`] when the
    /// name is taken.
    async fn insert(&self, shortcode: Shortcode) -> Result<()>;

    /// Replaces an existing record. Fails with [`ShortcoderError::NotFound`]
    /// when it is gone.
    async fn update(&self, shortcode: Shortcode) -> Result<()>;

    /// Fails with [`ShortcoderError::NotFound`] when nothing was removed.
    async fn remove(&self, name: &str) -> Result<()>;

    async fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.get(name).await?.is_some())
    }

    fn backend_name(&self) -> &'static str;

    /// Namespace (table) the records live in.
    fn namespace(&self) -> &str;
}

pub struct StoreFactory;

impl StoreFactory {
    pub fn create(config: &StaticConfig) -> Result<Arc<dyn ShortcodeStore>> {
        let table = &config.service.db_table_name;
        let store: Arc<dyn ShortcodeStore> = match config.storage.backend.as_str() {
            "memory" => Arc::new(MemoryStore::new(table)),
            "file" => Arc::new(FileStore::open(&config.storage.data_dir, table)?),
            other => {
                return Err(ShortcoderError::storage(format!(
                    "Unknown storage backend: {}. Valid: memory, file",
                    other
                )));
            }
        };
        info!(
            "Using storage backend: {} (table: {})",
            store.backend_name(),
            store.namespace()
        );
        Ok(store)
    }
}
