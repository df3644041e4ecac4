//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clinic::QueueBoard;
use crate::storage::{Appointment, AppointmentStatus, Doctor, VisitNote};

// ============================================
// AUTH DTOs
// ============================================

/// Login request
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Doctor profile; the password never leaves the server
#[derive(Debug, Serialize)]
pub struct DoctorResponse {
    pub id: Uuid,
    pub name: String,
    pub specialty: String,
    pub username: String,
}

impl From<&Doctor> for DoctorResponse {
    fn from(doctor: &Doctor) -> Self {
        Self {
            id: doctor.id,
            name: doctor.name.clone(),
            specialty: doctor.specialty.clone(),
            username: doctor.username.clone(),
        }
    }
}

/// Current session
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    pub doctor: Option<DoctorResponse>,
}

// ============================================
// APPOINTMENT DTOs
// ============================================

/// Visit note as returned by the API
#[derive(Debug, Serialize)]
pub struct VisitNoteResponse {
    pub symptoms: String,
    pub diagnosis: String,
    pub prescription: String,
    pub timestamp: DateTime<Utc>,
}

impl From<&VisitNote> for VisitNoteResponse {
    fn from(note: &VisitNote) -> Self {
        Self {
            symptoms: note.symptoms.clone(),
            diagnosis: note.diagnosis.clone(),
            prescription: note.prescription.clone(),
            timestamp: note.timestamp,
        }
    }
}

/// Appointment as returned by the API
#[derive(Debug, Serialize)]
pub struct AppointmentResponse {
    pub id: Uuid,
    pub queue_number: u32,
    pub patient_name: String,
    pub phone: String,
    pub reason: String,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visit_notes: Option<VisitNoteResponse>,
}

impl From<&Appointment> for AppointmentResponse {
    fn from(appt: &Appointment) -> Self {
        Self {
            id: appt.id,
            queue_number: appt.queue_number,
            patient_name: appt.patient_name.clone(),
            phone: appt.phone.clone(),
            reason: appt.reason.clone(),
            status: appt.status,
            created_at: appt.created_at,
            visit_notes: appt.visit_notes.as_ref().map(VisitNoteResponse::from),
        }
    }
}

/// Status change request
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    /// waiting, in_consult or done (case-insensitive)
    pub status: String,
}

/// Visit note request; missing fields are saved as empty text
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NoteRequest {
    pub symptoms: String,
    pub diagnosis: String,
    pub prescription: String,
}

// ============================================
// QUEUE DTOs
// ============================================

/// Dashboard columns
#[derive(Debug, Serialize)]
pub struct BoardResponse {
    pub waiting: Vec<AppointmentResponse>,
    pub in_consult: Vec<AppointmentResponse>,
    pub done: Vec<AppointmentResponse>,
    /// Token the next call would pick
    pub next_up: Option<u32>,
}

impl From<&QueueBoard<'_>> for BoardResponse {
    fn from(board: &QueueBoard<'_>) -> Self {
        Self {
            waiting: column(&board.waiting),
            in_consult: column(&board.in_consult),
            done: column(&board.done),
            next_up: board.next_up().map(|a| a.queue_number),
        }
    }
}

fn column(appts: &[&Appointment]) -> Vec<AppointmentResponse> {
    appts.iter().map(|a| AppointmentResponse::from(*a)).collect()
}

/// Result of calling the next patient
#[derive(Debug, Serialize)]
pub struct CallNextResponse {
    /// The appointment moved into consultation, if anyone was waiting
    pub called: Option<AppointmentResponse>,
}

// ============================================
// RECORDS DTOs
// ============================================

/// Records search query parameters
#[derive(Debug, Default, Deserialize)]
pub struct RecordsQuery {
    #[serde(default)]
    pub q: Option<String>,
}

/// Records search results, newest first
#[derive(Debug, Serialize)]
pub struct RecordsResponse {
    pub term: String,
    pub total: usize,
    pub records: Vec<AppointmentResponse>,
}

// ============================================
// ASSISTANT DTOs
// ============================================

/// Chat request
#[derive(Debug, Deserialize)]
pub struct AssistantRequest {
    pub query: String,
    /// Appointment whose visit note supplies the context
    #[serde(default)]
    pub appointment_id: Option<Uuid>,
}

/// Chat response
#[derive(Debug, Serialize)]
pub struct AssistantResponse {
    pub reply: String,
    pub context: String,
    pub model: String,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health status
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy or degraded
    pub status: String,
    /// Storage status
    pub storage: String,
    /// Assistant model in use
    pub assistant_model: String,
    pub doctors: usize,
    pub appointments: usize,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
