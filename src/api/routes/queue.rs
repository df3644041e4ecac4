//! Queue Routes
//!
//! - GET /api/v1/queue - Dashboard columns for the logged-in doctor
//! - POST /api/v1/queue/next - Move the lowest waiting token into consultation

use axum::{extract::State, Json};
use std::sync::Arc;

use super::require_session;
use crate::api::dto::{AppointmentResponse, BoardResponse, CallNextResponse};
use crate::api::error::ApiResult;
use crate::api::state::AppState;

/// GET /api/v1/queue
pub async fn get_board(State(state): State<Arc<AppState>>) -> ApiResult<Json<BoardResponse>> {
    let clinic = state.clinic.read().await;
    require_session(&clinic)?;

    Ok(Json(BoardResponse::from(&clinic.board())))
}

/// POST /api/v1/queue/next
///
/// Answers `{"called": null}` when nobody is waiting.
pub async fn call_next(State(state): State<Arc<AppState>>) -> ApiResult<Json<CallNextResponse>> {
    let mut clinic = state.clinic.write().await;
    require_session(&clinic)?;

    let called = clinic.call_next_patient()?;

    Ok(Json(CallNextResponse {
        called: called.as_ref().map(AppointmentResponse::from),
    }))
}
