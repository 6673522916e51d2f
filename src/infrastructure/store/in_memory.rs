//! In-memory key-value store implementation

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::store::KeyValueStore;
use crate::domain::DomainError;

/// Configuration for the in-memory store
#[derive(Debug, Clone, Default)]
pub struct InMemoryStoreConfig {
    /// Maximum total size in bytes (key + value lengths), unlimited if `None`
    pub quota_bytes: Option<usize>,
}

impl InMemoryStoreConfig {
    /// Sets the storage quota
    pub fn with_quota_bytes(mut self, quota: usize) -> Self {
        self.quota_bytes = Some(quota);
        self
    }
}

/// Thread-safe in-memory store
///
/// Useful for testing and development. Data is lost when the process terminates.
/// An optional quota mimics the size limit of browser local storage.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, String>>,
    config: InMemoryStoreConfig,
}

impl InMemoryStore {
    /// Creates a new empty store with no quota
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new empty store with the given configuration
    pub fn with_config(config: InMemoryStoreConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Creates a store pre-populated with raw entries
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
            config: InMemoryStoreConfig::default(),
        }
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let entries = self.entries.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let mut entries = self.entries.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        if let Some(quota) = self.config.quota_bytes {
            let used: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let required = used + key.len() + value.len();

            if required > quota {
                return Err(DomainError::storage(format!(
                    "Quota exceeded writing '{}': {} bytes required, {} allowed",
                    key, required, quota
                )));
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
