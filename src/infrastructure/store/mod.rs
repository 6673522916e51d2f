//! Store infrastructure - Key-value store implementations

mod factory;
mod file;
mod in_memory;

pub use factory::{StoreConfig, StoreFactory, StoreType};
pub use file::{FileStore, FileStoreConfig};
pub use in_memory::{InMemoryStore, InMemoryStoreConfig};
