//! Store domain - Persistent key-value abstraction used by the history cache

mod repository;

pub use repository::KeyValueStore;

#[cfg(test)]
pub use repository::MockKeyValueStore;
