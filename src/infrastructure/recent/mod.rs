//! Recent-searches cache infrastructure

mod service;

pub use service::{RecentSearchesService, RecentSearchesServiceTrait};
