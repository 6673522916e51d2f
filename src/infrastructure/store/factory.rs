//! Store factory for runtime backend selection

use std::sync::Arc;

use tracing::info;

use crate::domain::store::KeyValueStore;
use crate::domain::DomainError;

use super::file::{FileStore, FileStoreConfig};
use super::in_memory::{InMemoryStore, InMemoryStoreConfig};

/// Supported store backends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreType {
    /// In-memory store (for testing/development)
    InMemory,
    /// One file per key under a directory
    File,
}

impl StoreType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "file" | "fs" | "filesystem" => Some(Self::File),
            _ => None,
        }
    }
}

/// Store configuration
#[derive(Debug, Clone)]
pub enum StoreConfig {
    /// In-memory store configuration
    InMemory(InMemoryStoreConfig),
    /// File store configuration
    File(FileStoreConfig),
}

impl StoreConfig {
    /// Creates an unbounded in-memory store configuration
    pub fn in_memory() -> Self {
        Self::InMemory(InMemoryStoreConfig::default())
    }

    /// Creates a file store configuration rooted at `root`
    pub fn file(root: impl Into<std::path::PathBuf>) -> Self {
        Self::File(FileStoreConfig::new(root))
    }

    /// Returns the store type
    pub fn store_type(&self) -> StoreType {
        match self {
            Self::InMemory(_) => StoreType::InMemory,
            Self::File(_) => StoreType::File,
        }
    }
}

/// Factory for creating store instances
#[derive(Debug)]
pub struct StoreFactory;

impl StoreFactory {
    /// Creates a store instance based on the configuration
    pub async fn create(config: &StoreConfig) -> Result<Arc<dyn KeyValueStore>, DomainError> {
        match config {
            StoreConfig::InMemory(memory_config) => {
                info!(quota_bytes = ?memory_config.quota_bytes, "Using in-memory history store");
                Ok(Arc::new(InMemoryStore::with_config(memory_config.clone())))
            }
            StoreConfig::File(file_config) => {
                let store = FileStore::open(file_config).await?;
                info!(root = %store.root().display(), "Using file history store");
                Ok(Arc::new(store))
            }
        }
    }
}
