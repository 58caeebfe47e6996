//! Configuration model and discovery for casegen
//!
//! Configuration is loaded with precedence: CLI flags > config file >
//! built-in defaults. The config file is discovered by searching upward from
//! the current directory for `.casegen/config.toml`; an explicit path
//! overrides discovery.

mod discovery;
mod model;

pub use discovery::{CONFIG_RELATIVE_PATH, discover, load_file};
pub use model::{AnthropicConfig, Config, Defaults, LlmConfig, OpenRouterConfig};

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found at {path}")]
    NotFound { path: String },

    #[error("Invalid configuration file {path}: {reason}")]
    InvalidFile { path: String, reason: String },

    #[error("IO error reading configuration: {0}")]
    Io(#[from] std::io::Error),
}
