//! # DocQueue
//!
//! Clinic patient-queue manager. Doctors register and log in, add walk-in
//! patients to their own queue with sequential tokens starting at 101, call
//! patients in token order, write visit notes, search their records, and
//! consult an AI assistant for diagnosis and prescription drafts.
//!
//! ## Modules
//!
//! - [`storage`]: Record types and the JSON key-value store
//! - [`clinic`]: `ClinicStore` with auth, queue, notes and records search
//! - [`assistant`]: AI assistant adapter with a fail-open contract
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML configuration with environment overrides
//! - [`logging`]: Tracing subscriber setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docqueue::clinic::ClinicStore;
//! use docqueue::storage::{AppointmentStatus, VisitNote};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut clinic = ClinicStore::open_dir("./docqueue_data")?;
//!
//!     if !clinic.login("alice", "pw")? {
//!         clinic.register("Alice Smith", "General Practice", "alice", "pw")?;
//!     }
//!
//!     let appt = clinic
//!         .add_appointment("John Doe", "555-0100", "Fever")?
//!         .ok_or("not logged in")?;
//!     println!("Token {}", appt.queue_number);
//!
//!     if let Some(called) = clinic.call_next_patient()? {
//!         clinic.save_visit_note(called.id, VisitNote::new("Fever", "Influenza", "Rest"))?;
//!         clinic.update_status(called.id, AppointmentStatus::Done)?;
//!     }
//!
//!     for record in clinic.search_records("influenza") {
//!         println!("{} {}", record.queue_number, record.patient_name);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod assistant;
pub mod clinic;
pub mod config;
pub mod logging;
pub mod storage;

// Re-export top-level types for convenience
pub use storage::{
    Appointment, AppointmentStatus, Doctor, FileStore, KeyValueStore, MemoryStore, StorageError,
    StorageResult, VisitNote,
};

pub use clinic::{ClinicStats, ClinicStore, NewAppointmentForm, RegistrationForm, ValidationError};

pub use assistant::{AssistantError, Conversation, GeminiClient, MedicalAssistant, TextGenerator};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{ApiConfig, AssistantConfig, Config, ConfigError, LoggingConfig};
