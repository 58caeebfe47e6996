//! Core types for the generation backend abstraction

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::LlmError;

/// Default sampling temperature for generation requests
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Default response-length budget for generation requests
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 4000;

/// One prompt sent to a generation backend.
///
/// Ephemeral: built per call, no persistent identity.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Optional system-level instruction sent alongside the prompt
    pub system: Option<String>,
    /// The prompt text
    pub prompt: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Response-length budget
    pub max_output_tokens: u32,
}

impl GenerationRequest {
    /// Create a request with default temperature and length budget.
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
        }
    }

    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    #[must_use]
    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }
}

/// Raw text returned by a generation backend, with provider metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Raw response text
    pub text: String,
    /// Provider name (e.g., "openrouter", "anthropic")
    pub provider: String,
    /// Model that was actually used
    pub model: String,
    /// Input tokens consumed (if reported)
    pub tokens_input: Option<u64>,
    /// Output tokens generated (if reported)
    pub tokens_output: Option<u64>,
}

impl GenerationResponse {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        provider: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            provider: provider.into(),
            model: model.into(),
            tokens_input: None,
            tokens_output: None,
        }
    }

    #[must_use]
    pub fn with_tokens(mut self, input: u64, output: u64) -> Self {
        self.tokens_input = Some(input);
        self.tokens_output = Some(output);
        self
    }
}

/// Trait for generation backend implementations.
///
/// All providers implement this trait, allowing the orchestrator to work
/// with any provider without knowing implementation details.
#[async_trait]
pub trait LlmBackend: Send + Sync + std::fmt::Debug {
    /// Send one prompt and return the raw response text.
    ///
    /// # Errors
    ///
    /// Returns `LlmError` for any failure during invocation: transport
    /// failures, provider errors (auth, quota, outages), or timeouts.
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, LlmError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder_applies_overrides() {
        let request = GenerationRequest::new("prompt")
            .with_system("system")
            .with_temperature(0.7)
            .with_max_output_tokens(1024);

        assert_eq!(request.system.as_deref(), Some("system"));
        assert_eq!(request.prompt, "prompt");
        assert!((request.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(request.max_output_tokens, 1024);
    }

    #[test]
    fn request_defaults_match_generation_policy() {
        let request = GenerationRequest::new("prompt");
        assert!((request.temperature - DEFAULT_TEMPERATURE).abs() < f32::EPSILON);
        assert_eq!(request.max_output_tokens, DEFAULT_MAX_OUTPUT_TOKENS);
        assert!(request.system.is_none());
    }

    #[test]
    fn response_records_token_counts() {
        let response = GenerationResponse::new("text", "openrouter", "model").with_tokens(10, 20);
        assert_eq!(response.tokens_input, Some(10));
        assert_eq!(response.tokens_output, Some(20));
    }
}
