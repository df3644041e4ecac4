//! API Routes
//!
//! Route handlers organized by functionality.

pub mod appointments;
pub mod assistant;
pub mod auth;
pub mod health;
pub mod queue;
pub mod records;

use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::clinic::ClinicStore;

/// Id of the logged-in doctor, or 401
pub(crate) fn require_session(clinic: &ClinicStore) -> ApiResult<Uuid> {
    clinic
        .current_doctor()
        .map(|d| d.id)
        .ok_or_else(|| ApiError::Unauthorized("Login required".to_string()))
}

pub(crate) fn appointment_not_found(id: impl std::fmt::Display) -> ApiError {
    ApiError::NotFound(format!("Appointment {} not found", id))
}

/// Appointment id from a path segment; anything unparseable is unknown
pub(crate) fn parse_appointment_id(raw: &str) -> ApiResult<Uuid> {
    raw.parse().map_err(|_| appointment_not_found(raw))
}
