//! DocQueue Local Store
//!
//! This module provides key-value persistence for the clinic records:
//!
//! - **types**: Persisted records (Doctor, Appointment, VisitNote)
//! - **kv**: Key-value store trait with file and in-memory backends
//! - **error**: Error types
//!
//! # Layout
//!
//! ```text
//! <data_dir>/
//!   docqueue_users.json          all registered doctors
//!   docqueue_appointments.json   every appointment of every doctor
//!   docqueue_current_user.json   logged-in doctor (absent when logged out)
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use docqueue::storage::{load_json, save_json, Doctor, FileStore, USERS_KEY};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = FileStore::open("./docqueue_data")?;
//!
//!     let doctors = vec![Doctor::new("Alice", "GP", "alice", "pw")];
//!     save_json(&store, USERS_KEY, &doctors)?;
//!
//!     let loaded: Option<Vec<Doctor>> = load_json(&store, USERS_KEY)?;
//!     assert_eq!(loaded.map(|d| d.len()), Some(1));
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod kv;
pub mod types;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use kv::{
    load_json, save_json, FileStore, KeyValueStore, MemoryStore, APPOINTMENTS_KEY,
    CURRENT_USER_KEY, USERS_KEY,
};
pub use types::{Appointment, AppointmentStatus, Doctor, VisitNote, FIRST_QUEUE_NUMBER};
