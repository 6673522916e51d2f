//! Recent-searches cache service

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::recent::{
    Feature, FeatureTag, InteractionRecord, Payload, RecordClock, FEATURE_HISTORY_LIMIT,
    MERGED_HISTORY_LIMIT,
};
use crate::domain::store::KeyValueStore;
use crate::domain::DomainError;

/// Trait for the recent-searches cache
#[async_trait]
pub trait RecentSearchesServiceTrait: Send + Sync + Debug {
    /// Records a completed interaction and returns the feature's updated
    /// history, most recent first. Only a failed store write is an error.
    async fn add_record(
        &self,
        feature: &FeatureTag,
        payload: Payload,
    ) -> Result<Vec<InteractionRecord>, DomainError>;

    /// Stored history for a feature, most recent first; empty when the key is
    /// missing or unreadable.
    async fn get_records(&self, feature: &FeatureTag) -> Vec<InteractionRecord>;

    /// Newest records across all known features
    async fn get_all_records(&self) -> Vec<InteractionRecord>;
}

/// Store-backed recent-searches cache
pub struct RecentSearchesService {
    store: Arc<dyn KeyValueStore>,
    clock: RecordClock,
    write_lock: Mutex<()>,
}

impl RecentSearchesService {
    /// Create a new service over the given store
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_clock(store, RecordClock::new())
    }

    /// Create with a specific record clock
    pub fn with_clock(store: Arc<dyn KeyValueStore>, clock: RecordClock) -> Self {
        Self {
            store,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    /// Reads a feature's list, treating unreadable or corrupt data as empty
    async fn read_list(&self, feature: &FeatureTag) -> Vec<InteractionRecord> {
        let key = feature.storage_key();

        let raw = match self.store.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(key = %key, error = %e, "History read failed, treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<InteractionRecord>>(&raw) {
            Ok(records) => records
                .into_iter()
                .map(|record| record.with_feature(feature.clone()))
                .collect(),
            Err(e) => {
                warn!(key = %key, error = %e, "Corrupt history entry, treating as empty");
                Vec::new()
            }
        }
    }
}

impl Debug for RecentSearchesService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecentSearchesService")
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl RecentSearchesServiceTrait for RecentSearchesService {
    async fn add_record(
        &self,
        feature: &FeatureTag,
        payload: Payload,
    ) -> Result<Vec<InteractionRecord>, DomainError> {
        let _guard = self.write_lock.lock().await;

        let existing = self.read_list(feature).await;
        let (id, timestamp) = self
            .clock
            .next_after(existing.first().map(InteractionRecord::timestamp));
        let record = InteractionRecord::new(id, timestamp, feature.clone(), payload);

        let mut updated = Vec::with_capacity(FEATURE_HISTORY_LIMIT);
        updated.push(record);
        updated.extend(existing);
        updated.truncate(FEATURE_HISTORY_LIMIT);

        let serialized = serde_json::to_string(&updated)
            .map_err(|e| DomainError::internal(format!("Failed to serialize history: {}", e)))?;

        self.store.set(&feature.storage_key(), &serialized).await?;

        debug!(feature = %feature, record_id = %id, retained = updated.len(), "Recorded interaction");

        Ok(updated)
    }

    async fn get_records(&self, feature: &FeatureTag) -> Vec<InteractionRecord> {
        self.read_list(feature).await
    }

    async fn get_all_records(&self) -> Vec<InteractionRecord> {
        let mut all = Vec::new();

        for feature in Feature::ALL {
            all.extend(self.read_list(&feature.into()).await);
        }

        // Stable: equal timestamps keep feature order, then per-feature order
        all.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
        all.truncate(MERGED_HISTORY_LIMIT);

        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recent::RecordId;
    use crate::domain::store::MockKeyValueStore;
    use crate::infrastructure::store::{InMemoryStore, InMemoryStoreConfig};
    use chrono::{DateTime, Utc};

    fn service() -> (Arc<InMemoryStore>, RecentSearchesService) {
        let store = Arc::new(InMemoryStore::new());
        let service = RecentSearchesService::new(store.clone());
        (store, service)
    }

    fn tag(feature: Feature) -> FeatureTag {
        feature.into()
    }

    fn text(value: &str) -> Payload {
        Payload::new().with("text", value)
    }

    fn texts(records: &[InteractionRecord]) -> Vec<&str> {
        records
            .iter()
            .map(|r| r.payload().text("text").unwrap_or_default())
            .collect()
    }

    fn stored(feature: Feature, records: &[(u64, i64, &str)]) -> String {
        let records: Vec<InteractionRecord> = records
            .iter()
            .map(|(id, millis, value)| {
                InteractionRecord::new(
                    RecordId::new(*id),
                    DateTime::<Utc>::from_timestamp_millis(*millis).unwrap(),
                    feature.into(),
                    text(value),
                )
            })
            .collect();
        serde_json::to_string(&records).unwrap()
    }

    #[tokio::test]
    async fn test_add_record_returns_new_list() {
        let (_, service) = service();

        let list = service
            .add_record(&tag(Feature::TextToText), text("hi"))
            .await
            .unwrap();

        assert_eq!(list.len(), 1);
        assert_eq!(list[0].feature().as_str(), "TextToText");
        assert_eq!(list[0].payload().text("text"), Some("hi"));
    }

    #[tokio::test]
    async fn test_prepend_and_truncate() {
        let (_, service) = service();
        let feature = tag(Feature::TextToText);

        for i in 1..=6 {
            service
                .add_record(&feature, text(&format!("p{}", i)))
                .await
                .unwrap();
        }

        let records = service.get_records(&feature).await;
        assert_eq!(texts(&records), vec!["p6", "p5", "p4", "p3", "p2"]);
    }

    #[tokio::test]
    async fn test_feature_list_bounded_and_descending() {
        let (_, service) = service();
        let feature = tag(Feature::ImageToText);

        for i in 0..12 {
            let list = service
                .add_record(&feature, text(&i.to_string()))
                .await
                .unwrap();
            assert!(list.len() <= FEATURE_HISTORY_LIMIT);
        }

        let records = service.get_records(&feature).await;
        assert_eq!(records.len(), FEATURE_HISTORY_LIMIT);
        assert!(records
            .windows(2)
            .all(|w| w[0].timestamp() > w[1].timestamp() && w[0].id() > w[1].id()));
    }

    #[tokio::test]
    async fn test_writes_json_under_feature_key() {
        let (store, service) = service();

        service
            .add_record(&tag(Feature::TextToImage), Payload::new().with("prompt", "cat"))
            .await
            .unwrap();

        let raw = store.get("recentTextToImage").await.unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json[0]["prompt"], "cat");
        assert_eq!(json[0]["feature"], "TextToImage");
    }

    #[tokio::test]
    async fn test_isolation_between_features() {
        let (store, service) = service();

        service
            .add_record(&tag(Feature::TextToText), text("chat"))
            .await
            .unwrap();
        let before = store.get("recentTextToText").await.unwrap();

        service
            .add_record(&tag(Feature::TextToImage), Payload::new().with("prompt", "cat"))
            .await
            .unwrap();

        assert_eq!(store.get("recentTextToText").await.unwrap(), before);
        assert_eq!(service.get_records(&tag(Feature::TextToText)).await.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_tag_gets_distinct_key() {
        let (store, service) = service();
        let outpainting = FeatureTag::new("Outpainting").unwrap();

        service.add_record(&outpainting, text("wide")).await.unwrap();

        assert!(store.get("recentOutpainting").await.unwrap().is_some());
        assert_eq!(service.get_records(&outpainting).await.len(), 1);
        assert!(service.get_all_records().await.is_empty());
    }

    #[tokio::test]
    async fn test_corruption_resilience() {
        let store = Arc::new(InMemoryStore::with_entries([(
            "recentVoiceToText",
            r#"{"not":"a list"}"#,
        )]));
        let service = RecentSearchesService::new(store);
        let feature = tag(Feature::VoiceToText);

        assert!(service.get_records(&feature).await.is_empty());

        service.add_record(&feature, text("p")).await.unwrap();

        let records = service.get_records(&feature).await;
        assert_eq!(texts(&records), vec!["p"]);
    }

    #[tokio::test]
    async fn test_invalid_json_is_empty() {
        let store = Arc::new(InMemoryStore::with_entries([("recentTextToText", "not json")]));
        let service = RecentSearchesService::new(store);

        assert!(service.get_records(&tag(Feature::TextToText)).await.is_empty());
        assert!(service.get_all_records().await.is_empty());
    }

    #[tokio::test]
    async fn test_read_failure_does_not_block_write() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_get()
            .returning(|_| Err(DomainError::storage("disk unreadable")));
        store
            .expect_set()
            .withf(|key, _| key.to_string() == "recentTextToText")
            .times(1)
            .returning(|_, _| Ok(()));

        let service = RecentSearchesService::new(Arc::new(store));
        let list = service
            .add_record(&tag(Feature::TextToText), text("still saved"))
            .await
            .unwrap();

        assert_eq!(texts(&list), vec!["still saved"]);
    }

    #[tokio::test]
    async fn test_write_failure_propagates() {
        let mut store = MockKeyValueStore::new();
        store.expect_get().returning(|_| Ok(None));
        store
            .expect_set()
            .returning(|_, _| Err(DomainError::storage("quota exceeded")));

        let service = RecentSearchesService::new(Arc::new(store));
        let result = service
            .add_record(&tag(Feature::TextToAudio), text("hello"))
            .await;

        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_quota_exceeded_keeps_previous_list() {
        let store = Arc::new(InMemoryStore::with_config(
            InMemoryStoreConfig::default().with_quota_bytes(400),
        ));
        let service = RecentSearchesService::new(store);
        let feature = tag(Feature::TextToText);

        service.add_record(&feature, text("short")).await.unwrap();
        let result = service.add_record(&feature, text(&"x".repeat(500))).await;

        assert!(matches!(result, Err(DomainError::Storage { .. })));
        assert_eq!(texts(&service.get_records(&feature).await), vec!["short"]);
    }

    #[tokio::test]
    async fn test_get_all_records_bounded_sorted_tagged() {
        let (_, service) = service();

        for feature in Feature::ALL {
            for i in 0..3 {
                service
                    .add_record(&feature.into(), text(&format!("{}-{}", feature, i)))
                    .await
                    .unwrap();
            }
        }

        let all = service.get_all_records().await;
        assert_eq!(all.len(), MERGED_HISTORY_LIMIT);
        assert!(all.windows(2).all(|w| w[0].timestamp() >= w[1].timestamp()));
        assert_eq!(all[0].payload().text("text"), Some("TextToAudio-2"));
        assert_eq!(all[0].feature().as_str(), "TextToAudio");

        for record in &all {
            let expected_prefix = format!("{}-", record.feature());
            assert!(record
                .payload()
                .text("text")
                .unwrap()
                .starts_with(&expected_prefix));
        }
    }

    #[tokio::test]
    async fn test_get_all_records_tie_break_is_feature_order() {
        let store = Arc::new(InMemoryStore::with_entries([
            (
                "recentVoiceToText",
                stored(Feature::VoiceToText, &[(3, 1_000, "voice-a"), (2, 1_000, "voice-b")]),
            ),
            (
                "recentTextToText",
                stored(Feature::TextToText, &[(1, 1_000, "chat")]),
            ),
            (
                "recentTextToImage",
                stored(Feature::TextToImage, &[(4, 2_000, "image")]),
            ),
        ]));
        let service = RecentSearchesService::new(store);

        let all = service.get_all_records().await;
        assert_eq!(texts(&all), vec!["image", "chat", "voice-a", "voice-b"]);
    }

    #[tokio::test]
    async fn test_get_all_records_skips_corrupt_feature() {
        let store = Arc::new(InMemoryStore::with_entries([
            ("recentTextToText", "{broken".to_string()),
            (
                "recentImageToText",
                stored(Feature::ImageToText, &[(1, 1_000, "caption")]),
            ),
        ]));
        let service = RecentSearchesService::new(store);

        let all = service.get_all_records().await;
        assert_eq!(texts(&all), vec!["caption"]);
        assert_eq!(all[0].feature().as_str(), "ImageToText");
    }

    #[tokio::test]
    async fn test_merged_view_reattaches_feature_tag() {
        let store = Arc::new(InMemoryStore::with_entries([(
            "recentTextToAudio",
            r#"[{"id":1,"timestamp":"2024-05-01T12:00:00.000Z","text":"legacy"}]"#,
        )]));
        let service = RecentSearchesService::new(store);

        let all = service.get_all_records().await;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].feature().as_str(), "TextToAudio");
    }

    #[tokio::test]
    async fn test_reads_are_idempotent() {
        let (_, service) = service();
        service
            .add_record(&tag(Feature::TextToText), text("a"))
            .await
            .unwrap();
        service
            .add_record(&tag(Feature::VoiceToText), text("b"))
            .await
            .unwrap();

        let feature = tag(Feature::TextToText);
        assert_eq!(
            service.get_records(&feature).await,
            service.get_records(&feature).await
        );
        assert_eq!(service.get_all_records().await, service.get_all_records().await);
    }

    #[tokio::test]
    async fn test_end_to_end_scenario() {
        let (_, service) = service();

        service
            .add_record(&tag(Feature::VoiceToText), Payload::new().with("text", "hello"))
            .await
            .unwrap();
        service
            .add_record(&tag(Feature::TextToImage), Payload::new().with("prompt", "cat"))
            .await
            .unwrap();

        let all = service.get_all_records().await;
        assert_eq!(all.len(), 2);

        assert_eq!(all[0].feature().as_str(), "TextToImage");
        assert_eq!(all[0].payload().text("prompt"), Some("cat"));

        assert_eq!(all[1].feature().as_str(), "VoiceToText");
        assert_eq!(all[1].payload().text("text"), Some("hello"));
    }

    #[tokio::test]
    async fn test_new_record_sorts_after_future_dated_head() {
        let ahead = Utc::now() + chrono::Duration::hours(1);
        let store = Arc::new(InMemoryStore::with_entries([(
            "recentTextToText",
            stored(Feature::TextToText, &[(1, ahead.timestamp_millis(), "old")]),
        )]));
        let service = RecentSearchesService::new(store);
        let feature = tag(Feature::TextToText);

        service.add_record(&feature, text("new")).await.unwrap();

        let records = service.get_records(&feature).await;
        assert_eq!(texts(&records), vec!["new", "old"]);
        assert!(records[0].timestamp() > records[1].timestamp());
        assert!(records[0].id() > records[1].id());

        let all = service.get_all_records().await;
        assert_eq!(texts(&all), vec!["new", "old"]);
    }

    #[tokio::test]
    async fn test_concurrent_adds_are_not_lost() {
        let (_, service) = service();
        let service = Arc::new(service);
        let feature = tag(Feature::TextToText);

        let handles: Vec<_> = (0..FEATURE_HISTORY_LIMIT)
            .map(|i| {
                let service = service.clone();
                let feature = feature.clone();
                tokio::spawn(async move {
                    service.add_record(&feature, text(&i.to_string())).await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(service.get_records(&feature).await.len(), FEATURE_HISTORY_LIMIT);
    }
}
