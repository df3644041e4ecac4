//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use crate::assistant::MedicalAssistant;
use crate::clinic::ClinicStore;
use crate::config::ApiConfig;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Clinic store; one writer at a time
    pub clinic: Arc<RwLock<ClinicStore>>,
    /// AI assistant used by the chat endpoint
    pub assistant: MedicalAssistant,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(clinic: ClinicStore, assistant: MedicalAssistant, config: ApiConfig) -> Self {
        Self {
            clinic: Arc::new(RwLock::new(clinic)),
            assistant,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
