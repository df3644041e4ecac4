//! Clinic domain store
//!
//! `ClinicStore` owns the doctors, appointments and session loaded from a
//! `KeyValueStore`, and exposes the auth and queue operations. Every
//! mutation is applied in memory and immediately flushed; if the flush fails
//! the in-memory change is rolled back so callers never observe state that
//! was not persisted.
//!
//! Only appointments owned by the logged-in doctor are visible or mutable
//! through the store.

use crate::clinic::queue::{next_queue_number, QueueBoard};
use crate::clinic::records;
use crate::storage::{
    load_json, save_json, Appointment, AppointmentStatus, Doctor, FileStore, KeyValueStore,
    MemoryStore, StorageError, StorageResult, VisitNote, APPOINTMENTS_KEY, CURRENT_USER_KEY,
    USERS_KEY,
};
use std::collections::HashSet;
use std::path::Path;
use uuid::Uuid;

/// The clinic's state and operations
pub struct ClinicStore {
    backend: Box<dyn KeyValueStore>,
    doctors: Vec<Doctor>,
    appointments: Vec<Appointment>,
    session: Option<Doctor>,
}

impl std::fmt::Debug for ClinicStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClinicStore")
            .field("doctors", &self.doctors.len())
            .field("appointments", &self.appointments.len())
            .field("session", &self.session.as_ref().map(|d| &d.username))
            .finish()
    }
}

impl ClinicStore {
    /// Load the store from a key-value backend
    pub fn open(backend: impl KeyValueStore + 'static) -> StorageResult<Self> {
        let backend: Box<dyn KeyValueStore> = Box::new(backend);

        let doctors: Vec<Doctor> = load_json(backend.as_ref(), USERS_KEY)?.unwrap_or_default();
        let appointments: Vec<Appointment> =
            load_json(backend.as_ref(), APPOINTMENTS_KEY)?.unwrap_or_default();
        let stored_session: Option<Doctor> = load_json(backend.as_ref(), CURRENT_USER_KEY)?;

        validate_doctors(&doctors)?;
        validate_appointments(&appointments)?;

        // The session must name a registered doctor; the users list wins on drift
        let session = stored_session.and_then(|stored| {
            let found = doctors.iter().find(|d| d.id == stored.id).cloned();
            if found.is_none() {
                tracing::warn!(
                    username = %stored.username,
                    "Dropping session for unknown doctor"
                );
            }
            found
        });

        tracing::info!(
            doctors = doctors.len(),
            appointments = appointments.len(),
            session = session.as_ref().map(|d| d.username.as_str()).unwrap_or("-"),
            "Loaded clinic store"
        );

        Ok(Self {
            backend,
            doctors,
            appointments,
            session,
        })
    }

    /// Load the store from a data directory
    pub fn open_dir(dir: impl AsRef<Path>) -> StorageResult<Self> {
        Self::open(FileStore::open(dir.as_ref())?)
    }

    /// Empty store that persists nothing to disk
    pub fn in_memory() -> Self {
        Self {
            backend: Box::new(MemoryStore::new()),
            doctors: Vec::new(),
            appointments: Vec::new(),
            session: None,
        }
    }

    // ============================================
    // Session
    // ============================================

    /// Create an account and log it in
    ///
    /// Returns `false` without touching any state when `username` is taken.
    pub fn register(
        &mut self,
        name: &str,
        specialty: &str,
        username: &str,
        password: &str,
    ) -> StorageResult<bool> {
        if self.doctors.iter().any(|d| d.username == username) {
            tracing::info!(username = %username, "Registration rejected: username taken");
            return Ok(false);
        }

        let doctor = Doctor::new(name, specialty, username, password);
        self.doctors.push(doctor.clone());

        if let Err(e) = self.flush_doctors() {
            self.doctors.pop();
            return Err(e);
        }

        if let Err(e) = self.set_session(Some(doctor)) {
            self.doctors.pop();
            if let Err(undo) = self.flush_doctors() {
                tracing::error!(
                    username = %username,
                    error = %undo,
                    "Failed to undo registration"
                );
            }
            return Err(e);
        }

        tracing::info!(username = %username, "Doctor registered");
        Ok(true)
    }

    /// Log in with exact username and password
    pub fn login(&mut self, username: &str, password: &str) -> StorageResult<bool> {
        let found = self
            .doctors
            .iter()
            .find(|d| d.matches_credentials(username, password))
            .cloned();

        match found {
            Some(doctor) => {
                self.set_session(Some(doctor))?;
                tracing::info!(username = %username, "Doctor logged in");
                Ok(true)
            }
            None => {
                tracing::info!(username = %username, "Login failed");
                Ok(false)
            }
        }
    }

    /// Clear the session
    pub fn logout(&mut self) -> StorageResult<()> {
        if let Some(doctor) = &self.session {
            tracing::info!(username = %doctor.username, "Doctor logged out");
        }
        self.set_session(None)
    }

    /// Logged-in doctor, if any
    pub fn current_doctor(&self) -> Option<&Doctor> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    fn session_id(&self) -> Option<Uuid> {
        self.session.as_ref().map(|d| d.id)
    }

    fn set_session(&mut self, doctor: Option<Doctor>) -> StorageResult<()> {
        match &doctor {
            Some(d) => save_json(self.backend.as_ref(), CURRENT_USER_KEY, d)?,
            None => self.backend.remove(CURRENT_USER_KEY)?,
        }
        self.session = doctor;
        Ok(())
    }

    // ============================================
    // Queue
    // ============================================

    /// Add a walk-in patient to the logged-in doctor's queue
    ///
    /// Returns `None` when nobody is logged in.
    pub fn add_appointment(
        &mut self,
        patient_name: &str,
        phone: &str,
        reason: &str,
    ) -> StorageResult<Option<Appointment>> {
        let Some(doctor_id) = self.session_id() else {
            return Ok(None);
        };

        let queue_number = next_queue_number(self.owned_by(doctor_id)).ok_or_else(|| {
            StorageError::Corruption(format!("queue numbers exhausted for doctor {}", doctor_id))
        })?;
        let appt = Appointment::new(doctor_id, queue_number, patient_name, phone, reason);
        self.appointments.push(appt.clone());

        if let Err(e) = self.flush_appointments() {
            self.appointments.pop();
            return Err(e);
        }

        tracing::info!(
            token = queue_number,
            appointment_id = %appt.id,
            "Patient added to queue"
        );
        Ok(Some(appt))
    }

    /// Set an appointment's status
    ///
    /// Any transition is allowed. Returns `false` when the appointment does
    /// not exist or belongs to another doctor.
    pub fn update_status(&mut self, id: Uuid, status: AppointmentStatus) -> StorageResult<bool> {
        let Some(idx) = self.owned_index(id) else {
            return Ok(false);
        };

        let previous = self.appointments[idx].status;
        self.appointments[idx].status = status;

        if let Err(e) = self.flush_appointments() {
            self.appointments[idx].status = previous;
            return Err(e);
        }

        tracing::info!(
            token = self.appointments[idx].queue_number,
            from = %previous,
            to = %status,
            "Appointment status changed"
        );
        Ok(true)
    }

    /// Attach a visit note, replacing any earlier one
    ///
    /// Returns `false` when the appointment does not exist or belongs to
    /// another doctor.
    pub fn save_visit_note(&mut self, id: Uuid, note: VisitNote) -> StorageResult<bool> {
        let Some(idx) = self.owned_index(id) else {
            return Ok(false);
        };

        let previous = self.appointments[idx].visit_notes.replace(note);

        if let Err(e) = self.flush_appointments() {
            self.appointments[idx].visit_notes = previous;
            return Err(e);
        }

        tracing::info!(
            token = self.appointments[idx].queue_number,
            "Visit note saved"
        );
        Ok(true)
    }

    /// Move the lowest waiting token into consultation
    ///
    /// Returns the called appointment, or `None` (with nothing changed) when
    /// no patient is waiting.
    pub fn call_next_patient(&mut self) -> StorageResult<Option<Appointment>> {
        let Some(doctor_id) = self.session_id() else {
            return Ok(None);
        };

        let next = self
            .appointments
            .iter()
            .enumerate()
            .filter(|(_, a)| a.is_owned_by(doctor_id) && a.status == AppointmentStatus::Waiting)
            .min_by_key(|(_, a)| a.queue_number)
            .map(|(idx, _)| idx);

        let Some(idx) = next else {
            tracing::debug!("No patients waiting");
            return Ok(None);
        };

        self.appointments[idx].status = AppointmentStatus::InConsult;

        if let Err(e) = self.flush_appointments() {
            self.appointments[idx].status = AppointmentStatus::Waiting;
            return Err(e);
        }

        let called = self.appointments[idx].clone();
        tracing::info!(token = called.queue_number, "Called next patient");
        Ok(Some(called))
    }

    /// Look up an appointment owned by the logged-in doctor
    pub fn get_appointment(&self, id: Uuid) -> Option<&Appointment> {
        self.owned_index(id).map(|idx| &self.appointments[idx])
    }

    /// The logged-in doctor's appointments in insertion order
    pub fn appointments(&self) -> Vec<&Appointment> {
        match self.session_id() {
            Some(doctor_id) => self.owned_by(doctor_id).collect(),
            None => Vec::new(),
        }
    }

    /// Dashboard columns for the logged-in doctor
    pub fn board(&self) -> QueueBoard<'_> {
        QueueBoard::build(self.appointments())
    }

    /// Search the logged-in doctor's records, newest first
    pub fn search_records(&self, term: &str) -> Vec<&Appointment> {
        records::search(self.appointments(), term)
    }

    /// Every registered doctor
    pub fn doctors(&self) -> &[Doctor] {
        &self.doctors
    }

    /// Store-wide counters
    pub fn stats(&self) -> ClinicStats {
        let count = |status: AppointmentStatus| {
            self.appointments
                .iter()
                .filter(|a| a.status == status)
                .count()
        };

        ClinicStats {
            doctor_count: self.doctors.len(),
            appointment_count: self.appointments.len(),
            waiting: count(AppointmentStatus::Waiting),
            in_consult: count(AppointmentStatus::InConsult),
            done: count(AppointmentStatus::Done),
        }
    }

    fn owned_by(&self, doctor_id: Uuid) -> impl Iterator<Item = &Appointment> {
        self.appointments
            .iter()
            .filter(move |a| a.is_owned_by(doctor_id))
    }

    fn owned_index(&self, id: Uuid) -> Option<usize> {
        let doctor_id = self.session_id()?;
        self.appointments
            .iter()
            .position(|a| a.id == id && a.is_owned_by(doctor_id))
    }

    fn flush_doctors(&self) -> StorageResult<()> {
        save_json(self.backend.as_ref(), USERS_KEY, &self.doctors)
    }

    fn flush_appointments(&self) -> StorageResult<()> {
        save_json(self.backend.as_ref(), APPOINTMENTS_KEY, &self.appointments)
    }
}

/// Reject user lists with repeated usernames
fn validate_doctors(doctors: &[Doctor]) -> StorageResult<()> {
    let mut seen = HashSet::new();
    for doctor in doctors {
        if !seen.insert(doctor.username.as_str()) {
            return Err(StorageError::Corruption(format!(
                "duplicate username '{}'",
                doctor.username
            )));
        }
    }
    Ok(())
}

/// Reject zero tokens and tokens repeated within one doctor's queue
fn validate_appointments(appointments: &[Appointment]) -> StorageResult<()> {
    let mut seen = HashSet::new();
    for appt in appointments {
        if appt.queue_number == 0 {
            return Err(StorageError::Corruption(format!(
                "appointment {} has queue number 0",
                appt.id
            )));
        }
        if !seen.insert((appt.doctor_id, appt.queue_number)) {
            return Err(StorageError::Corruption(format!(
                "queue number {} repeated for doctor {}",
                appt.queue_number, appt.doctor_id
            )));
        }
    }
    Ok(())
}

/// Store statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct ClinicStats {
    pub doctor_count: usize,
    pub appointment_count: usize,
    pub waiting: usize,
    pub in_consult: usize,
    pub done: usize,
}

impl std::fmt::Display for ClinicStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Doctors: {}, Appointments: {} (waiting: {}, in consult: {}, done: {})",
            self.doctor_count, self.appointment_count, self.waiting, self.in_consult, self.done
        )
    }
}
