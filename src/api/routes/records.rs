//! Records Routes
//!
//! - GET /api/v1/records?q= - Search history by name, phone or diagnosis

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use super::require_session;
use crate::api::dto::{AppointmentResponse, RecordsQuery, RecordsResponse};
use crate::api::error::ApiResult;
use crate::api::state::AppState;

/// GET /api/v1/records
///
/// A missing or empty `q` lists every record.
pub async fn search_records(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecordsQuery>,
) -> ApiResult<Json<RecordsResponse>> {
    let clinic = state.clinic.read().await;
    require_session(&clinic)?;

    let term = params.q.unwrap_or_default();
    let records: Vec<AppointmentResponse> = clinic
        .search_records(&term)
        .into_iter()
        .map(AppointmentResponse::from)
        .collect();

    Ok(Json(RecordsResponse {
        term,
        total: records.len(),
        records,
    }))
}
