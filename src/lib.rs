//! AI Studio History
//!
//! Recent-searches cache for the AI Studio media utilities:
//! - Bounded per-feature history backed by a pluggable key-value store
//! - Merged, time-sorted view across features
//! - HTTP API and CLI over the cache

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::DomainError;
use infrastructure::recent::RecentSearchesService;
use infrastructure::store::StoreFactory;

/// Builds the application services from configuration
///
/// Everything handlers need is constructed here once and injected through
/// `AppState`; it is dropped when the process exits.
pub async fn create_app_state(config: &AppConfig) -> Result<AppState, DomainError> {
    let store_config = config.store.to_store_config()?;
    let store = StoreFactory::create(&store_config).await?;
    let recent_searches = Arc::new(RecentSearchesService::new(store.clone()));

    Ok(AppState::new(recent_searches, store))
}
