//! Recent-searches endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};

use crate::api::state::AppState;
use crate::api::types::{ApiError, RecordListResponse};
use crate::domain::recent::{FeatureTag, Payload};

pub fn create_recent_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_all))
        .route("/{feature}", get(list_feature).post(add_record))
}

/// GET /api/recent
pub async fn list_all(State(state): State<AppState>) -> Json<RecordListResponse> {
    let records = state.recent_searches.get_all_records().await;
    Json(records.into())
}

/// GET /api/recent/{feature}
pub async fn list_feature(
    State(state): State<AppState>,
    Path(feature): Path<String>,
) -> Result<Json<RecordListResponse>, ApiError> {
    let tag = parse_tag(&feature)?;
    let records = state.recent_searches.get_records(&tag).await;

    Ok(Json(records.into()))
}

/// POST /api/recent/{feature}
pub async fn add_record(
    State(state): State<AppState>,
    Path(feature): Path<String>,
    payload: Result<Json<Payload>, JsonRejection>,
) -> Result<Json<RecordListResponse>, ApiError> {
    let tag = parse_tag(&feature)?;
    let Json(payload) = payload?;

    let records = state.recent_searches.add_record(&tag, payload).await?;

    Ok(Json(records.into()))
}

fn parse_tag(feature: &str) -> Result<FeatureTag, ApiError> {
    FeatureTag::new(feature).map_err(|e| ApiError::from(e).with_param("feature"))
}
