//! Gemini REST API Client
//!
//! HTTP client for Google's `generateContent` endpoint, behind the
//! `TextGenerator` trait so the assistant can run against any backend.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A text-generation backend
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Model identifier sent with each request
    fn model(&self) -> &str;

    /// Generate text for a prompt under a system instruction
    async fn generate(&self, request: &GenerationRequest) -> Result<String, AssistantError>;
}

/// One outbound generation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub system_instruction: String,
    pub prompt: String,
}

/// Configuration for the Gemini client
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Base URL for the API (e.g., "https://generativelanguage.googleapis.com/v1beta")
    pub base_url: String,
    /// API key; requests fail without one
    pub api_key: Option<String>,
    /// Model identifier
    pub model: String,
    /// Request timeout in milliseconds (0 disables the timeout)
    pub request_timeout_ms: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: None,
            model: "gemini-2.5-flash".to_string(),
            request_timeout_ms: 60_000,
        }
    }
}

/// Gemini `generateContent` client
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a new client with the given configuration
    pub fn new(config: GeminiConfig) -> Self {
        let mut builder = Client::builder();
        if config.request_timeout_ms > 0 {
            builder = builder.timeout(std::time::Duration::from_millis(config.request_timeout_ms));
        }
        let client = builder.build().unwrap_or_else(|_| Client::new());

        Self { client, config }
    }

    /// Get the current configuration
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, AssistantError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(AssistantError::MissingApiKey)?;

        let body = GenerateContentRequest::from_request(request);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AssistantError::Timeout
                } else if e.is_connect() {
                    AssistantError::Unavailable
                } else {
                    AssistantError::Request(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AssistantError::ApiError {
                status: status.as_u16(),
                message: text,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::InvalidResponse(e.to_string()))?;

        Ok(parsed.text())
    }
}

// ============================================
// Request/Response DTOs
// ============================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
}

impl GenerateContentRequest {
    fn from_request(request: &GenerationRequest) -> Self {
        Self {
            system_instruction: Content::text(None, &request.system_instruction),
            contents: vec![Content::text(Some("user"), &request.prompt)],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

impl GenerateContentResponse {
    /// Text parts of the first candidate, concatenated
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

// ============================================
// Errors
// ============================================

/// Errors that can occur when calling the text-generation service
#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("No API key configured")]
    MissingApiKey,

    #[error("Assistant service unavailable")]
    Unavailable,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request timeout")]
    Timeout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeminiConfig::default();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_endpoint() {
        let client = GeminiClient::new(GeminiConfig {
            base_url: "http://localhost:9000/v1beta/".to_string(),
            ..Default::default()
        });
        assert_eq!(
            client.endpoint(),
            "http://localhost:9000/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateContentRequest::from_request(&GenerationRequest {
            system_instruction: "Be concise.".to_string(),
            prompt: "What next?".to_string(),
        });
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "Be concise.");
        assert!(value["systemInstruction"].get("role").is_none());
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "What next?");
    }

    #[test]
    fn test_response_text_joins_parts() {
        let json = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "Consider "}, {"text": "influenza."}]}},
                {"content": {"role": "model", "parts": [{"text": "ignored"}]}}
            ]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.text(), "Consider influenza.");
    }

    #[test]
    fn test_response_without_candidates() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.text(), "");
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let client = GeminiClient::new(GeminiConfig::default());
        let result = client
            .generate(&GenerationRequest {
                system_instruction: String::new(),
                prompt: "hi".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AssistantError::MissingApiKey)));
    }
}
