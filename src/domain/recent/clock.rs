//! Record id and timestamp generation

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};

use super::record::RecordId;

/// Issues `(id, timestamp)` pairs for new records
///
/// Ids are wall-clock milliseconds, bumped past the last issued value when
/// two records land in the same millisecond (or the clock steps back). The
/// timestamp is derived from the id, so both are strictly increasing within
/// a process.
#[derive(Debug, Default)]
pub struct RecordClock {
    last_millis: AtomicU64,
}

impl RecordClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id/timestamp pair based on the current time, later than `floor`
    ///
    /// `floor` is the newest timestamp already persisted for the list being
    /// written; a fresh process has no memory of it, and the wall clock may
    /// be behind it.
    pub fn next_after(&self, floor: Option<DateTime<Utc>>) -> (RecordId, DateTime<Utc>) {
        self.next_at(Utc::now(), floor)
    }

    /// Next id/timestamp pair given an explicit `now`
    pub fn next_at(
        &self,
        now: DateTime<Utc>,
        floor: Option<DateTime<Utc>>,
    ) -> (RecordId, DateTime<Utc>) {
        let now_millis = u64::try_from(now.timestamp_millis()).unwrap_or_default();
        let floor_millis = floor
            .and_then(|ts| u64::try_from(ts.timestamp_millis()).ok())
            .map_or(0, |millis| millis.saturating_add(1));
        let candidate = now_millis.max(floor_millis);

        let previous = self
            .last_millis
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(candidate.max(last.saturating_add(1)))
            })
            .unwrap_or_else(|last| last);
        let issued = candidate.max(previous.saturating_add(1));

        let timestamp = i64::try_from(issued)
            .ok()
            .and_then(DateTime::from_timestamp_millis)
            .unwrap_or(now);

        (RecordId::new(issued), timestamp)
    }
}
