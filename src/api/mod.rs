//! DocQueue REST API
//!
//! HTTP API layer for the clinic, built with Axum.
//!
//! # Endpoints
//!
//! ## Auth
//! - `POST /api/v1/auth/register` - Create an account and log in
//! - `POST /api/v1/auth/login` - Log in
//! - `POST /api/v1/auth/logout` - Log out
//! - `GET /api/v1/auth/session` - Current session
//!
//! ## Queue
//! - `GET /api/v1/queue` - Dashboard columns
//! - `POST /api/v1/queue/next` - Call the next patient
//!
//! ## Appointments
//! - `POST /api/v1/appointments` - Add a walk-in patient
//! - `GET /api/v1/appointments/:id` - Appointment detail
//! - `PUT /api/v1/appointments/:id/status` - Change status
//! - `PUT /api/v1/appointments/:id/notes` - Save the visit note
//!
//! ## Records
//! - `GET /api/v1/records?q=` - Search history
//!
//! ## Assistant
//! - `POST /api/v1/assistant` - Ask the AI assistant
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! Everything under `/api/v1` except the auth routes answers 401 while no
//! doctor is logged in.
//!
//! # Example
//!
//! ```rust,no_run
//! use docqueue::api::{serve, AppState};
//! use docqueue::assistant::{GeminiConfig, MedicalAssistant};
//! use docqueue::clinic::ClinicStore;
//! use docqueue::config::ApiConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let clinic = ClinicStore::open_dir("./docqueue_data")?;
//!     let assistant = MedicalAssistant::gemini(GeminiConfig::default());
//!     let config = ApiConfig::default();
//!
//!     let state = AppState::new(clinic, assistant, config.clone());
//!     serve(state, &config).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::ApiConfig;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Auth routes
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/logout", post(routes::auth::logout))
        .route("/auth/session", get(routes::auth::session))
        // Queue routes
        .route("/queue", get(routes::queue::get_board))
        .route("/queue/next", post(routes::queue::call_next))
        // Appointment routes
        .route("/appointments", post(routes::appointments::create_appointment))
        .route("/appointments/:id", get(routes::appointments::get_appointment))
        .route(
            "/appointments/:id/status",
            put(routes::appointments::update_status),
        )
        .route("/appointments/:id/notes", put(routes::appointments::save_notes))
        // Records routes
        .route("/records", get(routes::records::search_records))
        // Assistant routes
        .route("/assistant", post(routes::assistant::ask));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("DocQueue API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("DocQueue API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
