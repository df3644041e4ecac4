//! AI Assistant
//!
//! Drafts diagnoses and prescriptions for the doctor from the current
//! visit notes.
//!
//! ## Architecture
//!
//! - **Client**: `TextGenerator` trait and the Gemini REST implementation
//! - **MedicalAssistant**: prompt assembly and the fail-open wrapper
//! - **Conversation**: in-memory chat transcript
//!
//! ## Data Flow
//!
//! 1. The caller summarizes the open appointment's note with `build_context`
//! 2. `MedicalAssistant::generate` adds the system instruction and prompt
//! 3. The backend returns text, or any failure becomes `FALLBACK_ERROR`

mod chat;
mod client;

pub use chat::{
    build_context, build_prompt, ChatMessage, ChatRole, Conversation, MedicalAssistant,
    EMPTY_RESPONSE, FALLBACK_ERROR, NONE_PROVIDED, SYSTEM_INSTRUCTION,
};
pub use client::{AssistantError, GeminiClient, GeminiConfig, GenerationRequest, TextGenerator};
