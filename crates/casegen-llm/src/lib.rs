//! Generation backend abstraction for multi-provider support
//!
//! This crate provides a trait-based system for invoking text-generation
//! providers over HTTP. All providers implement the [`LlmBackend`] trait,
//! allowing the orchestrator to work with any provider without knowing
//! implementation details.

mod anthropic_backend;
mod error;
pub(crate) mod http_client;
mod openrouter_backend;
mod types;

#[cfg(any(test, feature = "test-utils"))]
mod scripted;

pub use error::LlmError;
pub use types::{
    DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_TEMPERATURE, GenerationRequest, GenerationResponse,
    LlmBackend,
};

// Test seam; not part of public API stability guarantees.
#[cfg(any(test, feature = "test-utils"))]
#[doc(hidden)]
pub use scripted::{ScriptedBackend, ScriptedReply};

pub(crate) use anthropic_backend::AnthropicBackend;
pub(crate) use openrouter_backend::OpenRouterBackend;

use casegen_config::Config;
use tracing::warn;

/// Metadata recorded when the primary provider fails to construct and a
/// configured fallback is used instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmFallbackInfo {
    pub primary_provider: String,
    pub fallback_provider: String,
    pub reason: String,
}

impl LlmFallbackInfo {
    /// Human-readable warning describing the fallback.
    #[must_use]
    pub fn warning_message(&self) -> String {
        format!(
            "llm_fallback: primary provider '{}' failed ({}); using fallback provider '{}'",
            self.primary_provider, self.reason, self.fallback_provider
        )
    }
}

/// Construct a backend for a specific provider.
///
/// Internal helper with no fallback logic; that's `from_config_with_fallback`.
fn construct_backend_for_provider(
    provider: &str,
    config: &Config,
) -> Result<Box<dyn LlmBackend>, LlmError> {
    match provider {
        "openrouter" => {
            let backend = OpenRouterBackend::new_from_config(config)?;
            Ok(Box::new(backend))
        }
        "anthropic" => {
            let backend = AnthropicBackend::new_from_config(config)?;
            Ok(Box::new(backend))
        }
        unknown => Err(LlmError::Unsupported(format!(
            "Unknown LLM provider '{}'. Supported providers: openrouter, anthropic.",
            unknown
        ))),
    }
}

/// Create a generation backend from configuration, returning fallback
/// metadata when the fallback provider was used.
///
/// Fallback is only triggered on construction/validation failure, never on
/// runtime errors: once a backend is constructed, invocation failures are the
/// orchestrator's to handle within its own retry budget.
///
/// # Errors
///
/// Returns `LlmError::Unsupported` for an unknown provider and
/// `LlmError::Misconfiguration` for invalid provider configuration. When a
/// fallback is configured and also fails, the primary error is returned.
pub fn from_config_with_fallback(
    config: &Config,
) -> Result<(Box<dyn LlmBackend>, Option<LlmFallbackInfo>), LlmError> {
    let provider = config.llm.provider.as_deref().unwrap_or("openrouter");

    let primary_result = construct_backend_for_provider(provider, config);

    match primary_result {
        Ok(backend) => Ok((backend, None)),
        Err(primary_error) => {
            let Some(fallback_provider) = config.llm.fallback_provider.as_deref() else {
                return Err(primary_error);
            };

            let reason = http_client::redact_error_message(&primary_error.to_string());
            warn!(
                primary = provider,
                fallback = fallback_provider,
                reason = %reason,
                "Primary provider failed during construction; attempting fallback"
            );

            match construct_backend_for_provider(fallback_provider, config) {
                Ok(fallback_backend) => Ok((
                    fallback_backend,
                    Some(LlmFallbackInfo {
                        primary_provider: provider.to_string(),
                        fallback_provider: fallback_provider.to_string(),
                        reason,
                    }),
                )),
                Err(fallback_error) => {
                    warn!(
                        fallback = fallback_provider,
                        error = %http_client::redact_error_message(&fallback_error.to_string()),
                        "Fallback provider also failed"
                    );
                    // The primary error is the more relevant one
                    Err(primary_error)
                }
            }
        }
    }
}

/// Create a generation backend from configuration.
///
/// Defaults to the `openrouter` provider when none is configured.
///
/// # Errors
///
/// See [`from_config_with_fallback`].
pub fn from_config(config: &Config) -> Result<Box<dyn LlmBackend>, LlmError> {
    let (backend, _fallback_info) = from_config_with_fallback(config)?;
    Ok(backend)
}

#[cfg(test)]
mod factory_tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    // Single lock for tests that touch environment variables, so they don't
    // run concurrently with each other.
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_guard() -> std::sync::MutexGuard<'static, ()> {
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
    }

    #[test]
    fn unknown_provider_fails_cleanly() {
        let mut config = Config::minimal_for_testing();
        config.llm.provider = Some("invalid-provider".to_string());

        let result = from_config(&config);
        match result {
            Err(LlmError::Unsupported(msg)) => {
                assert!(msg.contains("invalid-provider"));
                assert!(msg.contains("Unknown LLM provider"));
            }
            _ => panic!("Expected LlmError::Unsupported for invalid-provider"),
        }
    }

    #[test]
    fn default_provider_is_openrouter() {
        let _guard = env_guard();
        unsafe {
            std::env::remove_var("OPENROUTER_API_KEY");
        }

        let mut config = Config::minimal_for_testing();
        config.llm.provider = None;

        // Without an API key in the environment, construction must fail with
        // a Misconfiguration naming the OpenRouter key variable.
        let result = from_config(&config);
        match result {
            Err(LlmError::Misconfiguration(msg)) => {
                assert!(msg.contains("OPENROUTER_API_KEY"), "got: {msg}");
            }
            Ok(_) => {
                // Acceptable when the variable is present in the test env
            }
            Err(e) => panic!("Expected Misconfiguration or Ok, got {e:?}"),
        }
    }

    #[test]
    fn fallback_on_missing_api_key() {
        let _guard = env_guard();
        unsafe {
            std::env::remove_var("MISSING_OPENROUTER_KEY_FACTORY");
            std::env::set_var("ANTHROPIC_API_KEY_FACTORY_FALLBACK", "test-key");
        }

        let mut config = Config::minimal_for_testing();
        config.llm.provider = Some("openrouter".to_string());
        config.llm.fallback_provider = Some("anthropic".to_string());
        config.llm.openrouter = Some(casegen_config::OpenRouterConfig {
            base_url: None,
            api_key_env: Some("MISSING_OPENROUTER_KEY_FACTORY".to_string()),
            model: Some("google/gemini-2.0-flash-lite".to_string()),
            max_tokens: None,
            temperature: None,
        });
        config.llm.anthropic = Some(casegen_config::AnthropicConfig {
            base_url: None,
            api_key_env: Some("ANTHROPIC_API_KEY_FACTORY_FALLBACK".to_string()),
            model: Some("claude-3-5-haiku-latest".to_string()),
            max_tokens: None,
            temperature: None,
        });

        let result = from_config_with_fallback(&config);

        unsafe {
            std::env::remove_var("ANTHROPIC_API_KEY_FACTORY_FALLBACK");
        }

        match result {
            Ok((_backend, fallback_info)) => {
                let info = fallback_info.expect("Expected fallback info when fallback is used");
                assert_eq!(info.primary_provider, "openrouter");
                assert_eq!(info.fallback_provider, "anthropic");

                let warning = info.warning_message();
                assert!(warning.contains("llm_fallback"));
                assert!(warning.contains("openrouter"));
                assert!(warning.contains("anthropic"));
            }
            Err(e) => panic!("Expected fallback backend to be constructed, got error: {e}"),
        }
    }

    #[test]
    fn both_providers_failing_returns_primary_error() {
        let _guard = env_guard();
        unsafe {
            std::env::remove_var("MISSING_OPENROUTER_KEY_BOTH");
            std::env::remove_var("MISSING_ANTHROPIC_KEY_BOTH");
        }

        let mut config = Config::minimal_for_testing();
        config.llm.provider = Some("openrouter".to_string());
        config.llm.fallback_provider = Some("anthropic".to_string());
        config.llm.openrouter = Some(casegen_config::OpenRouterConfig {
            base_url: None,
            api_key_env: Some("MISSING_OPENROUTER_KEY_BOTH".to_string()),
            model: Some("google/gemini-2.0-flash-lite".to_string()),
            max_tokens: None,
            temperature: None,
        });
        config.llm.anthropic = Some(casegen_config::AnthropicConfig {
            base_url: None,
            api_key_env: Some("MISSING_ANTHROPIC_KEY_BOTH".to_string()),
            model: Some("claude-3-5-haiku-latest".to_string()),
            max_tokens: None,
            temperature: None,
        });

        let result = from_config(&config);
        match result {
            Err(LlmError::Misconfiguration(msg)) => {
                // Primary (openrouter) error is returned, not the fallback's
                assert!(msg.contains("MISSING_OPENROUTER_KEY_BOTH"), "got: {msg}");
            }
            other => panic!("Expected primary Misconfiguration, got {other:?}"),
        }
    }
}
