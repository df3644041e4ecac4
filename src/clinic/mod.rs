//! Clinic Domain
//!
//! The patient-queue logic on top of the local store:
//!
//! - **store**: `ClinicStore` with auth and queue operations
//! - **queue**: Dashboard column ordering and token assignment
//! - **records**: History search by name, phone, or diagnosis
//! - **forms**: Required-field validation for registration and walk-ins
//!
//! # Example
//!
//! ```rust
//! use docqueue::clinic::ClinicStore;
//!
//! let mut clinic = ClinicStore::in_memory();
//! assert!(clinic.register("Alice Smith", "General Practice", "alice", "pw").unwrap());
//!
//! let appt = clinic.add_appointment("John Doe", "555-0100", "Fever").unwrap().unwrap();
//! assert_eq!(appt.queue_number, 101);
//!
//! let called = clinic.call_next_patient().unwrap().unwrap();
//! assert_eq!(called.id, appt.id);
//! ```

pub mod forms;
pub mod queue;
pub mod records;
pub mod store;

pub use forms::{NewAppointmentForm, RegistrationForm, ValidationError};
pub use queue::{next_queue_number, QueueBoard, DONE_COLUMN_LIMIT};
pub use store::{ClinicStats, ClinicStore};
