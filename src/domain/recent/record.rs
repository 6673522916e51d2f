//! Interaction record entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::feature::FeatureTag;
use super::payload::Payload;

/// Payload keys that collide with record fields and are dropped on creation
pub const RESERVED_KEYS: [&str; 3] = ["id", "timestamp", "feature"];

const PREVIEW_CHARS: usize = 60;

/// Unique, creation-ordered identifier of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(u64);

impl RecordId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One completed use of a feature
///
/// Serialized flat: payload keys sit beside `id`, `timestamp` and `feature`,
/// e.g. `{"id":1714564800123,"timestamp":"2024-05-01T12:00:00.123Z","feature":"TextToImage","prompt":"cat"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    id: RecordId,
    #[serde(with = "iso_millis")]
    timestamp: DateTime<Utc>,
    #[serde(default)]
    feature: FeatureTag,
    #[serde(flatten)]
    payload: Payload,
}

impl InteractionRecord {
    pub fn new(
        id: RecordId,
        timestamp: DateTime<Utc>,
        feature: FeatureTag,
        mut payload: Payload,
    ) -> Self {
        for key in RESERVED_KEYS {
            if payload.remove(key).is_some() {
                tracing::debug!(key, "Dropped reserved key from record payload");
            }
        }

        Self {
            id,
            timestamp,
            feature,
            payload,
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn feature(&self) -> &FeatureTag {
        &self.feature
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Returns the record re-tagged with the feature it was read under
    pub fn with_feature(mut self, feature: FeatureTag) -> Self {
        self.feature = feature;
        self
    }

    /// Short human-readable summary of the payload
    pub fn preview(&self) -> String {
        if self.payload.is_empty() {
            return "No preview available".to_string();
        }

        if let Some(prompt) = self.payload.text("prompt") {
            return truncate(prompt);
        }

        if let Some(text) = self.payload.text("text") {
            return truncate(text);
        }

        if let Some(file_name) = self.payload.text("fileName") {
            return format!("File: {}", file_name);
        }

        if let Some(input) = self.payload.text("input") {
            return truncate(input);
        }

        "View details".to_string()
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let head: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

/// ISO-8601 with millisecond precision and a `Z` suffix
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
