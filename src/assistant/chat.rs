//! Medical Assistant
//!
//! Wraps a `TextGenerator` with the clinic prompt and the fail-open
//! contract: `generate` always returns displayable text, never an error.

use crate::assistant::client::{GeminiClient, GeminiConfig, GenerationRequest, TextGenerator};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shown when the service cannot be reached or rejects the request
pub const FALLBACK_ERROR: &str = "Error connecting to AI assistant. Please check your API key.";

/// Shown when the service answers with no text
pub const EMPTY_RESPONSE: &str = "I apologize, I couldn't generate a response.";

/// Placeholder for absent note fields in the context summary
pub const NONE_PROVIDED: &str = "None provided";

pub const SYSTEM_INSTRUCTION: &str = "You are a helpful AI medical assistant for a doctor in a clinic. \
Your goal is to assist the doctor by suggesting potential diagnoses based on symptoms, \
summarizing medical notes, or drafting prescription advice. \
Be concise, professional, and use medical terminology where appropriate. \
Do not provide definitive medical advice to patients directly; you are speaking to a professional.";

/// Summarize the current notes for the prompt
pub fn build_context(symptoms: Option<&str>, diagnosis: Option<&str>) -> String {
    let or_placeholder = |value: Option<&str>| {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(NONE_PROVIDED)
            .to_string()
    };

    format!(
        "Symptoms: {}. Diagnosis: {}.",
        or_placeholder(symptoms),
        or_placeholder(diagnosis)
    )
}

/// Prompt text sent alongside the system instruction
pub fn build_prompt(context: &str, query: &str) -> String {
    format!(
        "Context: The doctor is currently seeing a patient.\n\
         Current Notes/Symptoms: {}\n\
         \n\
         Doctor's Query: {}\n\
         \n\
         Please provide a helpful response.",
        context, query
    )
}

/// Stateless assistant adapter
#[derive(Clone)]
pub struct MedicalAssistant {
    generator: Arc<dyn TextGenerator>,
}

impl MedicalAssistant {
    /// Create an assistant over any backend
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Create an assistant backed by Gemini
    pub fn gemini(config: GeminiConfig) -> Self {
        Self::new(Arc::new(GeminiClient::new(config)))
    }

    /// Model identifier of the backend
    pub fn model(&self) -> &str {
        self.generator.model()
    }

    /// Answer a query given the context summary
    ///
    /// Failures are logged and replaced by `FALLBACK_ERROR`.
    pub async fn generate(&self, context: &str, query: &str) -> String {
        let request = GenerationRequest {
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            prompt: build_prompt(context, query),
        };

        match self.generator.generate(&request).await {
            Ok(text) if text.trim().is_empty() => {
                tracing::warn!(model = %self.model(), "Assistant returned no text");
                EMPTY_RESPONSE.to_string()
            }
            Ok(text) => {
                tracing::debug!(model = %self.model(), chars = text.len(), "Assistant responded");
                text
            }
            Err(e) => {
                tracing::error!(model = %self.model(), error = %e, "Assistant request failed");
                FALLBACK_ERROR.to_string()
            }
        }
    }
}

/// Who sent a chat message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// One entry in a chat transcript
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

/// In-memory chat transcript with the assistant
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send a query and record both sides
    ///
    /// Blank queries are ignored and return `None`.
    pub async fn ask(
        &mut self,
        assistant: &MedicalAssistant,
        context: &str,
        query: &str,
    ) -> Option<&ChatMessage> {
        if query.trim().is_empty() {
            return None;
        }

        self.messages.push(ChatMessage {
            role: ChatRole::User,
            text: query.to_string(),
        });

        let reply = assistant.generate(context, query).await;
        self.messages.push(ChatMessage {
            role: ChatRole::Model,
            text: reply,
        });

        self.messages.last()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::client::AssistantError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records the last request and answers with a fixed reply
    struct Scripted {
        reply: Result<String, ()>,
        seen: Mutex<Option<GenerationRequest>>,
    }

    impl Scripted {
        fn ok(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                seen: Mutex::new(None),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: Err(()),
                seen: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for Scripted {
        fn model(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, request: &GenerationRequest) -> Result<String, AssistantError> {
            *self.seen.lock().unwrap() = Some(request.clone());
            self.reply.clone().map_err(|_| AssistantError::Unavailable)
        }
    }

    #[test]
    fn test_build_context_placeholders() {
        assert_eq!(
            build_context(None, None),
            "Symptoms: None provided. Diagnosis: None provided."
        );
        assert_eq!(
            build_context(Some("Fever, cough"), Some("  ")),
            "Symptoms: Fever, cough. Diagnosis: None provided."
        );
    }

    #[test]
    fn test_build_prompt_embeds_context_and_query() {
        let prompt = build_prompt("Symptoms: Fever.", "Suggest a diagnosis");
        assert!(prompt.contains("Current Notes/Symptoms: Symptoms: Fever."));
        assert!(prompt.contains("Doctor's Query: Suggest a diagnosis"));
    }

    #[tokio::test]
    async fn test_generate_passes_through_text() {
        let backend = Scripted::ok("Likely viral pharyngitis.");
        let assistant = MedicalAssistant::new(backend.clone());

        let text = assistant.generate("Symptoms: Sore throat.", "Diagnosis?").await;
        assert_eq!(text, "Likely viral pharyngitis.");

        let seen = backend.seen.lock().unwrap().clone().unwrap();
        assert_eq!(seen.system_instruction, SYSTEM_INSTRUCTION);
        assert!(seen.prompt.contains("Diagnosis?"));
    }

    #[tokio::test]
    async fn test_generate_fails_open() {
        let assistant = MedicalAssistant::new(Scripted::failing());
        assert_eq!(assistant.generate("ctx", "q").await, FALLBACK_ERROR);
    }

    #[tokio::test]
    async fn test_generate_empty_reply() {
        let assistant = MedicalAssistant::new(Scripted::ok("   "));
        assert_eq!(assistant.generate("ctx", "q").await, EMPTY_RESPONSE);
    }

    #[tokio::test]
    async fn test_gemini_without_key_falls_back() {
        let assistant = MedicalAssistant::gemini(GeminiConfig::default());
        assert_eq!(assistant.generate("ctx", "q").await, FALLBACK_ERROR);
    }

    #[tokio::test]
    async fn test_conversation_records_both_sides() {
        let assistant = MedicalAssistant::new(Scripted::ok("Amoxicillin 500mg."));
        let mut chat = Conversation::new();

        assert!(chat.ask(&assistant, "ctx", "   ").await.is_none());
        assert!(chat.is_empty());

        let reply = chat.ask(&assistant, "ctx", "Draft a prescription").await.unwrap();
        assert_eq!(reply.role, ChatRole::Model);

        assert_eq!(
            chat.messages(),
            &[
                ChatMessage {
                    role: ChatRole::User,
                    text: "Draft a prescription".to_string()
                },
                ChatMessage {
                    role: ChatRole::Model,
                    text: "Amoxicillin 500mg.".to_string()
                },
            ]
        );
    }
}
