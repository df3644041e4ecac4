//! Auth Routes
//!
//! - POST /api/v1/auth/register - Create an account and log it in
//! - POST /api/v1/auth/login - Log in
//! - POST /api/v1/auth/logout - Clear the session
//! - GET /api/v1/auth/session - Current session

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::{DoctorResponse, LoginRequest, SessionResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::clinic::RegistrationForm;

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(form): Json<RegistrationForm>,
) -> ApiResult<(StatusCode, Json<DoctorResponse>)> {
    form.validate()?;

    let mut clinic = state.clinic.write().await;
    let created = clinic.register(&form.name, &form.specialty, &form.username, &form.password)?;
    if !created {
        return Err(ApiError::Conflict("Username already exists".to_string()));
    }

    let doctor = clinic
        .current_doctor()
        .map(DoctorResponse::from)
        .ok_or_else(|| ApiError::Internal("Session missing after registration".to_string()))?;

    Ok((StatusCode::CREATED, Json(doctor)))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<DoctorResponse>> {
    let mut clinic = state.clinic.write().await;

    if !clinic.login(&req.username, &req.password)? {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    clinic
        .current_doctor()
        .map(|d| Json(DoctorResponse::from(d)))
        .ok_or_else(|| ApiError::Internal("Session missing after login".to_string()))
}

/// POST /api/v1/auth/logout
pub async fn logout(State(state): State<Arc<AppState>>) -> ApiResult<StatusCode> {
    state.clinic.write().await.logout()?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/session
pub async fn session(State(state): State<Arc<AppState>>) -> Json<SessionResponse> {
    let clinic = state.clinic.read().await;
    let doctor = clinic.current_doctor().map(DoctorResponse::from);

    Json(SessionResponse {
        authenticated: doctor.is_some(),
        doctor,
    })
}
