//! Assistant Routes
//!
//! - POST /api/v1/assistant - Ask the AI assistant a question
//!
//! When `appointment_id` is given, that appointment's visit note is used as
//! context. The reply is always text; service failures come back as the
//! fallback message with status 200.

use axum::{extract::State, Json};
use std::sync::Arc;

use super::{appointment_not_found, require_session};
use crate::api::dto::{AssistantRequest, AssistantResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::assistant::build_context;

/// POST /api/v1/assistant
pub async fn ask(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AssistantRequest>,
) -> ApiResult<Json<AssistantResponse>> {
    if req.query.trim().is_empty() {
        return Err(ApiError::Validation("query is required".to_string()));
    }

    // Release the store lock before calling out
    let context = {
        let clinic = state.clinic.read().await;
        require_session(&clinic)?;

        match req.appointment_id {
            Some(id) => {
                let appt = clinic
                    .get_appointment(id)
                    .ok_or_else(|| appointment_not_found(id))?;
                let note = appt.visit_notes.as_ref();
                build_context(
                    note.map(|n| n.symptoms.as_str()),
                    note.map(|n| n.diagnosis.as_str()),
                )
            }
            None => build_context(None, None),
        }
    };

    let reply = state.assistant.generate(&context, &req.query).await;

    Ok(Json(AssistantResponse {
        reply,
        context,
        model: state.assistant.model().to_string(),
    }))
}
