//! Application state for shared services

use std::sync::Arc;

use crate::domain::store::KeyValueStore;
use crate::infrastructure::recent::RecentSearchesServiceTrait;

/// Services constructed once at startup and injected into handlers
#[derive(Clone)]
pub struct AppState {
    pub recent_searches: Arc<dyn RecentSearchesServiceTrait>,
    pub store: Arc<dyn KeyValueStore>,
}

impl AppState {
    pub fn new(
        recent_searches: Arc<dyn RecentSearchesServiceTrait>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            recent_searches,
            store,
        }
    }
}
