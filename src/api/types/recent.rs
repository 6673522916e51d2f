//! Recent-searches DTOs

use chrono::SecondsFormat;
use serde::Serialize;

use crate::domain::recent::{InteractionRecord, Payload};

#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub id: u64,
    pub timestamp: String,
    pub feature: String,
    pub payload: Payload,
    pub preview: String,
}

impl From<InteractionRecord> for RecordResponse {
    fn from(record: InteractionRecord) -> Self {
        Self {
            id: record.id().value(),
            timestamp: record
                .timestamp()
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            feature: record.feature().to_string(),
            preview: record.preview(),
            payload: record.payload().clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecordListResponse {
    pub records: Vec<RecordResponse>,
    pub count: usize,
}

impl From<Vec<InteractionRecord>> for RecordListResponse {
    fn from(records: Vec<InteractionRecord>) -> Self {
        let records: Vec<RecordResponse> = records.into_iter().map(Into::into).collect();
        Self {
            count: records.len(),
            records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recent::{Feature, RecordId};
    use chrono::DateTime;

    #[test]
    fn test_record_response_shape() {
        let record = InteractionRecord::new(
            RecordId::new(7),
            DateTime::from_timestamp_millis(1_714_564_800_000).unwrap(),
            Feature::TextToImage.into(),
            Payload::new().with("prompt", "cat"),
        );

        let json = serde_json::to_value(RecordListResponse::from(vec![record])).unwrap();

        assert_eq!(json["count"], 1);
        assert_eq!(json["records"][0]["id"], 7);
        assert_eq!(json["records"][0]["timestamp"], "2024-05-01T12:00:00.000Z");
        assert_eq!(json["records"][0]["feature"], "TextToImage");
        assert_eq!(json["records"][0]["payload"]["prompt"], "cat");
        assert_eq!(json["records"][0]["preview"], "cat");
    }
}
