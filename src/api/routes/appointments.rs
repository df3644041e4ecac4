//! Appointment Routes
//!
//! - POST /api/v1/appointments - Add a walk-in patient to the queue
//! - GET /api/v1/appointments/:id - Appointment detail
//! - PUT /api/v1/appointments/:id/status - Change status
//! - PUT /api/v1/appointments/:id/notes - Save the visit note
//!
//! Appointments belonging to another doctor answer 404.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use super::{appointment_not_found, parse_appointment_id, require_session};
use crate::api::dto::{AppointmentResponse, NoteRequest, StatusRequest};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::clinic::{ClinicStore, NewAppointmentForm};
use crate::storage::{AppointmentStatus, VisitNote};

/// POST /api/v1/appointments
pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    Json(form): Json<NewAppointmentForm>,
) -> ApiResult<(StatusCode, Json<AppointmentResponse>)> {
    let mut clinic = state.clinic.write().await;
    require_session(&clinic)?;
    form.validate()?;

    let appt = clinic
        .add_appointment(&form.patient_name, &form.phone, &form.reason)?
        .ok_or_else(|| ApiError::Unauthorized("Login required".to_string()))?;

    Ok((StatusCode::CREATED, Json(AppointmentResponse::from(&appt))))
}

/// GET /api/v1/appointments/:id
pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<AppointmentResponse>> {
    let clinic = state.clinic.read().await;
    require_session(&clinic)?;
    let id = parse_appointment_id(&id)?;

    owned_response(&clinic, id).map(Json)
}

/// PUT /api/v1/appointments/:id/status
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<StatusRequest>,
) -> ApiResult<Json<AppointmentResponse>> {
    let status: AppointmentStatus = req.status.parse().map_err(ApiError::Validation)?;

    let mut clinic = state.clinic.write().await;
    require_session(&clinic)?;
    let id = parse_appointment_id(&id)?;

    if !clinic.update_status(id, status)? {
        return Err(appointment_not_found(id));
    }

    owned_response(&clinic, id).map(Json)
}

/// PUT /api/v1/appointments/:id/notes
pub async fn save_notes(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<NoteRequest>,
) -> ApiResult<Json<AppointmentResponse>> {
    let mut clinic = state.clinic.write().await;
    require_session(&clinic)?;
    let id = parse_appointment_id(&id)?;

    let note = VisitNote::new(req.symptoms, req.diagnosis, req.prescription);
    if !clinic.save_visit_note(id, note)? {
        return Err(appointment_not_found(id));
    }

    owned_response(&clinic, id).map(Json)
}

fn owned_response(clinic: &ClinicStore, id: Uuid) -> ApiResult<AppointmentResponse> {
    clinic
        .get_appointment(id)
        .map(AppointmentResponse::from)
        .ok_or_else(|| appointment_not_found(id))
}
