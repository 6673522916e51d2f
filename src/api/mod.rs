//! API layer - HTTP endpoints over the recent-searches cache

pub mod health;
pub mod middleware;
pub mod recent;
pub mod router;
pub mod state;
pub mod types;

pub use router::create_router;
pub use state::AppState;
