//! Core data types for the DocQueue store
//!
//! This module defines the records persisted by the local store:
//! - `Doctor`: A registered account that owns a queue
//! - `Appointment`: One walk-in patient in a doctor's queue
//! - `VisitNote`: The clinical note attached to an appointment
//! - `AppointmentStatus`: Waiting, in consultation, or done
//!
//! Field names serialize in camelCase so existing store files stay readable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// First token handed out in an empty queue
pub const FIRST_QUEUE_NUMBER: u32 = 101;

/// A registered doctor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    /// Unique identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Medical specialty (free text)
    pub specialty: String,
    /// Login name, unique across all doctors
    pub username: String,
    /// Stored as entered; compared verbatim at login
    #[serde(default)]
    pub password: String,
}

impl Doctor {
    /// Create a doctor with a freshly generated id
    pub fn new(
        name: impl Into<String>,
        specialty: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            specialty: specialty.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Exact, case-sensitive credential check
    pub fn matches_credentials(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

/// Where an appointment is in the clinic flow
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    /// In the queue, not yet called
    Waiting,
    /// Currently with the doctor
    InConsult,
    /// Visit finished
    Done,
}

impl AppointmentStatus {
    /// Get all statuses in flow order
    pub fn all() -> &'static [AppointmentStatus] {
        &[
            AppointmentStatus::Waiting,
            AppointmentStatus::InConsult,
            AppointmentStatus::Done,
        ]
    }

    /// Human-readable label ("IN CONSULT" rather than "IN_CONSULT")
    pub fn label(&self) -> &'static str {
        match self {
            AppointmentStatus::Waiting => "WAITING",
            AppointmentStatus::InConsult => "IN CONSULT",
            AppointmentStatus::Done => "DONE",
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppointmentStatus::Waiting => write!(f, "WAITING"),
            AppointmentStatus::InConsult => write!(f, "IN_CONSULT"),
            AppointmentStatus::Done => write!(f, "DONE"),
        }
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace([' ', '-'], "_").as_str() {
            "WAITING" => Ok(AppointmentStatus::Waiting),
            "IN_CONSULT" | "CONSULT" => Ok(AppointmentStatus::InConsult),
            "DONE" => Ok(AppointmentStatus::Done),
            other => Err(format!(
                "Unknown status '{}'. Use: waiting, in_consult, done",
                other
            )),
        }
    }
}

/// Clinical note for a single visit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VisitNote {
    pub symptoms: String,
    pub diagnosis: String,
    pub prescription: String,
    /// When the note was written
    pub timestamp: DateTime<Utc>,
}

impl VisitNote {
    /// Create a note stamped with the current time
    pub fn new(
        symptoms: impl Into<String>,
        diagnosis: impl Into<String>,
        prescription: impl Into<String>,
    ) -> Self {
        Self {
            symptoms: symptoms.into(),
            diagnosis: diagnosis.into(),
            prescription: prescription.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A patient's place in one doctor's queue
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    /// Unique identifier
    pub id: Uuid,
    /// Token number, unique per doctor
    pub queue_number: u32,
    pub patient_name: String,
    pub phone: String,
    #[serde(default)]
    pub reason: String,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    /// Owning doctor, fixed at creation
    pub doctor_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit_notes: Option<VisitNote>,
}

impl Appointment {
    /// Create a waiting appointment stamped with the current time
    pub fn new(
        doctor_id: Uuid,
        queue_number: u32,
        patient_name: impl Into<String>,
        phone: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            queue_number,
            patient_name: patient_name.into(),
            phone: phone.into(),
            reason: reason.into(),
            status: AppointmentStatus::Waiting,
            created_at: Utc::now(),
            doctor_id,
            visit_notes: None,
        }
    }

    /// Builder: set creation time
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Builder: set status
    pub fn status(mut self, status: AppointmentStatus) -> Self {
        self.status = status;
        self
    }

    /// Check whether this appointment belongs to the given doctor
    pub fn is_owned_by(&self, doctor_id: Uuid) -> bool {
        self.doctor_id == doctor_id
    }

    /// Diagnosis from the visit note, if one was saved
    pub fn diagnosis(&self) -> Option<&str> {
        self.visit_notes.as_ref().map(|n| n.diagnosis.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&AppointmentStatus::InConsult).unwrap();
        assert_eq!(json, "\"IN_CONSULT\"");

        let status: AppointmentStatus = serde_json::from_str("\"DONE\"").unwrap();
        assert_eq!(status, AppointmentStatus::Done);
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("waiting".parse::<AppointmentStatus>(), Ok(AppointmentStatus::Waiting));
        assert_eq!("in consult".parse::<AppointmentStatus>(), Ok(AppointmentStatus::InConsult));
        assert_eq!("IN_CONSULT".parse::<AppointmentStatus>(), Ok(AppointmentStatus::InConsult));
        assert_eq!("done".parse::<AppointmentStatus>(), Ok(AppointmentStatus::Done));
        assert!("cancelled".parse::<AppointmentStatus>().is_err());
    }

    #[test]
    fn test_appointment_camel_case_fields() {
        let doctor_id = Uuid::new_v4();
        let appt = Appointment::new(doctor_id, 101, "Jane Roe", "555-0100", "Cough");
        let value = serde_json::to_value(&appt).unwrap();

        assert_eq!(value["queueNumber"], 101);
        assert_eq!(value["patientName"], "Jane Roe");
        assert_eq!(value["status"], "WAITING");
        assert_eq!(value["doctorId"], doctor_id.to_string());
        assert!(value.get("visitNotes").is_none());
    }

    #[test]
    fn test_appointment_reads_camel_case_layout() {
        let json = r#"{
            "id": "7b1c9a52-0d7e-4a8e-9c55-3f1b2a6d4e10",
            "queueNumber": 102,
            "patientName": "John Doe",
            "phone": "(555) 123-4567",
            "reason": "Fever",
            "status": "IN_CONSULT",
            "createdAt": "2024-03-01T09:30:00.000Z",
            "doctorId": "0f4e2c7a-6b1d-4d3e-8a9f-112233445566",
            "visitNotes": {
                "symptoms": "High temperature",
                "diagnosis": "Influenza",
                "prescription": "Rest",
                "timestamp": "2024-03-01T09:45:00.000Z"
            }
        }"#;

        let appt: Appointment = serde_json::from_str(json).unwrap();
        assert_eq!(appt.queue_number, 102);
        assert_eq!(appt.status, AppointmentStatus::InConsult);
        assert_eq!(appt.diagnosis(), Some("Influenza"));
    }

    #[test]
    fn test_appointment_rejects_missing_fields() {
        let json = r#"{"id": "7b1c9a52-0d7e-4a8e-9c55-3f1b2a6d4e10", "patientName": "X"}"#;
        assert!(serde_json::from_str::<Appointment>(json).is_err());
    }

    #[test]
    fn test_doctor_credentials_are_case_sensitive() {
        let doctor = Doctor::new("Alice", "GP", "alice", "pw");

        assert!(doctor.matches_credentials("alice", "pw"));
        assert!(!doctor.matches_credentials("Alice", "pw"));
        assert!(!doctor.matches_credentials("alice", "PW"));
    }
}
