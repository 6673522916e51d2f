//! Key-value store trait definition

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::domain::DomainError;

/// Durable string-keyed storage with no cross-key transactions
///
/// Values are opaque strings; callers own (de)serialization. A `set`
/// replaces the whole value at `key`, so readers never observe a partial
/// update of a single key.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Gets the raw value stored at `key`, or `None` if the key is absent
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Stores `value` at `key`, overwriting any previous value
    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError>;
}
