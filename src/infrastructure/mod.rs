//! Infrastructure layer - Store backends and service implementations

pub mod logging;
pub mod recent;
pub mod store;
