//! Recent-searches domain
//!
//! Per-feature interaction history with bounded retention and a merged,
//! time-sorted view across features.

mod clock;
mod display;
mod feature;
mod payload;
mod record;

pub use clock::RecordClock;
pub use display::format_relative;
pub use feature::{Feature, FeatureTag, MAX_TAG_BYTES, STORAGE_KEY_PREFIX};
pub use payload::{Payload, PayloadValue};
pub use record::{InteractionRecord, RecordId, RESERVED_KEYS};

/// Records retained per feature, most recent first
pub const FEATURE_HISTORY_LIMIT: usize = 5;

/// Records returned by the merged cross-feature view
pub const MERGED_HISTORY_LIMIT: usize = 10;
