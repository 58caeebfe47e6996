//! Anthropic HTTP backend implementation
//!
//! HTTP-based generation backend for Anthropic's Messages API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::error::LlmError;
use crate::http_client::HttpClient;
use crate::types::{GenerationRequest, GenerationResponse, LlmBackend};

/// Default Anthropic API endpoint
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1/messages";

/// Anthropic API version header value
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic backend configuration
#[derive(Clone, Debug)]
pub(crate) struct AnthropicBackend {
    client: Arc<HttpClient>,
    base_url: String,
    api_key: String,
    model: String,
}

impl AnthropicBackend {
    /// Create a new Anthropic backend.
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

    /// Create a new Anthropic backend from configuration.
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
            .anthropic
            .as_ref()
            .and_then(|a| a.api_key_env.as_deref())
            .unwrap_or("ANTHROPIC_API_KEY");

        let api_key = std::env::var(api_key_env).map_err(|_| {
            LlmError::Misconfiguration(format!(
                "Anthropic API key not found in environment variable '{}'. \
                 Please set this variable or configure a different api_key_env in [llm.anthropic].",
                api_key_env
            ))
        })?;

        let base_url = config
            .llm
            .anthropic
            .as_ref()
            .and_then(|a| a.base_url.clone());

        let model = config
            .llm
            .anthropic
            .as_ref()
            .and_then(|a| a.model.clone())
            .ok_or_else(|| {
                LlmError::Misconfiguration(
                    "Anthropic model not specified in configuration. \
                     Please set [llm.anthropic] model = \"model-name\"."
                        .to_string(),
                )
            })?;

        Self::new(api_key, base_url, model)
    }
}

#[async_trait]
impl LlmBackend for AnthropicBackend {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, LlmError> {
        debug!(
            provider = "anthropic",
            model = %self.model,
            max_tokens = request.max_output_tokens,
            temperature = request.temperature,
            "Invoking Anthropic backend"
        );

        let request_body = AnthropicRequest {
            model: self.model.clone(),
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: request.prompt.clone(),
            }],
            max_tokens: request.max_output_tokens,
            temperature: request.temperature,
            system: request.system.clone(),
        };

        let http_request = reqwest::Client::new()
            .post(&self.base_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body);

        let response = self
            .client
            .execute_with_retry(http_request, "anthropic")
            .await?;

        let response_body: AnthropicResponse = response.json().await.map_err(|e| {
            LlmError::Transport(format!("Failed to parse Anthropic response: {}", e))
        })?;

        // Concatenate all text blocks
        let content: String = response_body
            .content
            .iter()
            .filter(|block| block.content_type == "text")
            .filter_map(|block| block.text.as_deref())
            .collect();

        if content.is_empty() {
            return Err(LlmError::Transport(
                "Anthropic response missing text content".to_string(),
            ));
        }

        let mut result = GenerationResponse::new(content, "anthropic", self.model.clone());

        if let Some(usage) = response_body.usage {
            result.tokens_input = Some(usage.input_tokens);
            result.tokens_output = Some(usage.output_tokens);
        }

        debug!(
            provider = "anthropic",
            tokens_input = ?result.tokens_input,
            tokens_output = ?result.tokens_output,
            "Anthropic invocation completed"
        );

        Ok(result)
    }
}

/// Anthropic message format for requests
#[derive(Debug, Clone, Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

/// Anthropic request body
#[derive(Debug, Clone, Serialize)]
struct AnthropicRequest {
    model: String,
    messages: Vec<AnthropicMessage>,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
}

/// Anthropic response body
#[derive(Debug, Clone, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    usage: Option<Usage>,
}

/// Content block in Anthropic response
#[derive(Debug, Clone, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

/// Token usage information
#[derive(Debug, Clone, Deserialize)]
struct Usage {
    input_tokens: u64,
    output_tokens: u64,
}
