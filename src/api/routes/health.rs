//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (ready to serve traffic)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use std::time::Duration;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;
use crate::clinic::ClinicStats;

const LOCK_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Returns 503 while the store cannot be read, e.g. a writer is stuck.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    match probe_store(&state).await {
        Some(_) => StatusCode::OK,
        None => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// GET /health
///
/// Full health status with component details.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let stats = probe_store(&state).await;

    let (status, storage) = match stats {
        Some(_) => ("healthy", "ok"),
        None => ("degraded", "busy"),
    };
    let stats = stats.unwrap_or_default();

    Json(HealthResponse {
        status: status.to_string(),
        storage: storage.to_string(),
        assistant_model: state.assistant.model().to_string(),
        doctors: stats.doctor_count,
        appointments: stats.appointment_count,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn probe_store(state: &AppState) -> Option<ClinicStats> {
    tokio::time::timeout(LOCK_PROBE_TIMEOUT, state.clinic.read())
        .await
        .ok()
        .map(|clinic| clinic.stats())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness() {
        let status = liveness().await;
        assert_eq!(status, StatusCode::OK);
    }
}
