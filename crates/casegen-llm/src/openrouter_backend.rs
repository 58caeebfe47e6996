//! OpenRouter HTTP backend implementation
//!
//! HTTP-based generation backend for OpenRouter, which exposes many models
//! through a unified OpenAI-compatible chat-completions API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::error::LlmError;
use crate::http_client::HttpClient;
use crate::types::{GenerationRequest, GenerationResponse, LlmBackend};

/// Default OpenRouter API endpoint
const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default X-Title header value
const DEFAULT_TITLE: &str = "casegen";

/// OpenRouter backend configuration
#[derive(Clone, Debug)]
pub(crate) struct OpenRouterBackend {
    client: Arc<HttpClient>,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenRouterBackend {
    /// Create a new OpenRouter backend.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the HTTP client cannot be
    /// constructed.
    pub fn new(api_key: String, base_url: Option<String>, model: String) -> Result<Self, LlmError> {
        let client = HttpClient::new()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
            model,
        })
    }

    /// Create a new OpenRouter backend from configuration.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if:
    /// - The API key environment variable is not set
    /// - No model is configured
    /// - The HTTP client cannot be constructed
    pub fn new_from_config(config: &casegen_config::Config) -> Result<Self, LlmError> {
        let api_key_env = config
            .llm
            .openrouter
            .as_ref()
            .and_then(|or| or.api_key_env.as_deref())
            .unwrap_or("OPENROUTER_API_KEY");

        let api_key = std::env::var(api_key_env).map_err(|_| {
            LlmError::Misconfiguration(format!(
                "OpenRouter API key not found in environment variable '{}'. \
                 Please set this variable or configure a different api_key_env in [llm.openrouter].",
                api_key_env
            ))
        })?;

        let base_url = config
            .llm
            .openrouter
            .as_ref()
            .and_then(|or| or.base_url.clone());

        let model = config
            .llm
            .openrouter
            .as_ref()
            .and_then(|or| or.model.clone())
            .ok_or_else(|| {
                LlmError::Misconfiguration(
                    "OpenRouter model not specified in configuration. \
                     Please set [llm.openrouter] model = \"model-name\"."
                        .to_string(),
                )
            })?;

        Self::new(api_key, base_url, model)
    }

    /// Convert a generation request to OpenAI-compatible messages.
    fn convert_messages(request: &GenerationRequest) -> Vec<OpenAiMessage> {
        let mut messages = Vec::new();
        if let Some(system) = &request.system {
            messages.push(OpenAiMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }
        messages.push(OpenAiMessage {
            role: "user".to_string(),
            content: request.prompt.clone(),
        });
        messages
    }
}

#[async_trait]
impl LlmBackend for OpenRouterBackend {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, LlmError> {
        debug!(
            provider = "openrouter",
            model = %self.model,
            max_tokens = request.max_output_tokens,
            temperature = request.temperature,
            "Invoking OpenRouter backend"
        );

        let request_body = OpenRouterRequest {
            model: self.model.clone(),
            messages: Self::convert_messages(&request),
            max_tokens: request.max_output_tokens,
            temperature: request.temperature,
            stream: false,
        };

        let http_request = reqwest::Client::new()
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("X-Title", DEFAULT_TITLE)
            .header("Content-Type", "application/json")
            .json(&request_body);

        let response = self
            .client
            .execute_with_retry(http_request, "openrouter")
            .await?;

        let response_body: OpenRouterResponse = response.json().await.map_err(|e| {
            LlmError::Transport(format!("Failed to parse OpenRouter response: {}", e))
        })?;

        let content = response_body
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(LlmError::Transport(
                "OpenRouter response missing message content".to_string(),
            ));
        }

        let mut result = GenerationResponse::new(content, "openrouter", self.model.clone());

        if let Some(usage) = response_body.usage {
            result.tokens_input = Some(usage.prompt_tokens);
            result.tokens_output = Some(usage.completion_tokens);
        }

        debug!(
            provider = "openrouter",
            tokens_input = ?result.tokens_input,
            tokens_output = ?result.tokens_output,
            "OpenRouter invocation completed"
        );

        Ok(result)
    }
}

/// OpenAI-compatible message format
#[derive(Debug, Clone, Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

/// OpenRouter request body
#[derive(Debug, Clone, Serialize)]
struct OpenRouterRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

/// OpenRouter response body
#[derive(Debug, Clone, Deserialize)]
struct OpenRouterResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

/// A single completion choice
#[derive(Debug, Clone, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

/// Message within a completion choice
#[derive(Debug, Clone, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Token usage information
#[derive(Debug, Clone, Deserialize)]
struct Usage {
    prompt_tokens: u64,
    completion_tokens: u64,
}
