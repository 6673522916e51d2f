//! API request/response types

pub mod error;
pub mod recent;

pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use recent::{RecordListResponse, RecordResponse};
