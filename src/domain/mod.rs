//! Domain layer - Core history entities and storage contracts

pub mod error;
pub mod recent;
pub mod store;

pub use error::DomainError;
pub use recent::{
    Feature, FeatureTag, InteractionRecord, Payload, PayloadValue, RecordClock, RecordId,
    FEATURE_HISTORY_LIMIT, MERGED_HISTORY_LIMIT,
};
pub use store::KeyValueStore;
