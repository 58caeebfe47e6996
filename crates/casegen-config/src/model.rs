//! Configuration data model
//!
//! All fields are optional on disk; consumers apply their own defaults so a
//! missing config file behaves the same as an empty one.
//!
//! ```toml
//! [defaults]
//! temperature = 0.2
//! max_output_tokens = 4000
//! positive = 3
//! negative = 2
//! edge = 1
//!
//! [llm]
//! provider = "openrouter"
//! fallback_provider = "anthropic"
//!
//! [llm.openrouter]
//! api_key_env = "OPENROUTER_API_KEY"
//! model = "google/gemini-2.0-flash-lite"
//! ```

use serde::{Deserialize, Serialize};

/// Configuration for casegen operations.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Default values for generation parameters and quota counts.
    #[serde(default)]
    pub defaults: Defaults,
    /// LLM provider configuration.
    #[serde(default)]
    pub llm: LlmConfig,
}

impl Config {
    /// Minimal configuration for tests: no providers, no defaults.
    ///
    /// Test seam; behaves like a run with no config file present.
    #[must_use]
    pub fn minimal_for_testing() -> Self {
        Self::default()
    }
}

/// Default generation parameters and quota counts
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Defaults {
    /// Sampling temperature for generation calls.
    pub temperature: Option<f32>,
    /// Response-length budget for generation calls.
    pub max_output_tokens: Option<u32>,
    /// Default requested count of positive test cases.
    pub positive: Option<u32>,
    /// Default requested count of negative test cases.
    pub negative: Option<u32>,
    /// Default requested count of edge test cases.
    pub edge: Option<u32>,
}

/// LLM provider configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LlmConfig {
    /// Provider to use: "openrouter" (default) or "anthropic".
    pub provider: Option<String>,
    /// Provider to fall back to when the primary fails to construct.
    pub fallback_provider: Option<String>,
    pub openrouter: Option<OpenRouterConfig>,
    pub anthropic: Option<AnthropicConfig>,
}

/// OpenRouter provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenRouterConfig {
    pub base_url: Option<String>,
    /// Environment variable holding the API key (default: OPENROUTER_API_KEY).
    pub api_key_env: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

/// Anthropic provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnthropicConfig {
    pub base_url: Option<String>,
    /// Environment variable holding the API key (default: ANTHROPIC_API_KEY).
    pub api_key_env: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_deserializes_to_defaults() {
        let config: Config = toml::from_str("").expect("empty config should parse");
        assert!(config.llm.provider.is_none());
        assert!(config.defaults.temperature.is_none());
    }

    #[test]
    fn full_config_round_trips() {
        let toml_text = r#"
[defaults]
temperature = 0.2
max_output_tokens = 4000
positive = 3
negative = 2
edge = 1

[llm]
provider = "openrouter"
fallback_provider = "anthropic"

[llm.openrouter]
api_key_env = "OPENROUTER_API_KEY"
model = "google/gemini-2.0-flash-lite"
max_tokens = 4000
temperature = 0.2
"#;
        let config: Config = toml::from_str(toml_text).expect("config should parse");
        assert_eq!(config.llm.provider.as_deref(), Some("openrouter"));
        assert_eq!(config.defaults.positive, Some(3));
        let openrouter = config.llm.openrouter.expect("openrouter table");
        assert_eq!(openrouter.model.as_deref(), Some("google/gemini-2.0-flash-lite"));
        assert!(config.llm.anthropic.is_none());
    }

    #[test]
    fn unknown_provider_string_is_preserved() {
        let config: Config =
            toml::from_str("[llm]\nprovider = \"claude-cli\"\n").expect("should parse");
        assert_eq!(config.llm.provider.as_deref(), Some("claude-cli"));
    }
}
