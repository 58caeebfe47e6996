//! casegen - LLM-backed test-case generation with quota-aware orchestration
//!
//! casegen turns a natural-language requirement into structured test-case
//! records by repeatedly prompting a text-generation provider, tolerating its
//! unreliable output format, and reconciling the result against a requested
//! quota per test category (positive / negative / edge).
//!
//! casegen can be used in two ways:
//! - **CLI**: `casegen generate --input requirement.txt --positive 3`
//! - **Library**: construct a [`Generator`] with any [`LlmBackend`] and call
//!   [`Generator::generate`]
//!
//! # Quick Start (CLI)
//!
//! ```bash
//! export OPENROUTER_API_KEY=...
//! echo "Users log in with email and password" | casegen generate
//! casegen doctor
//! ```
//!
//! # Quick Start (Library)
//!
//! ```rust,no_run
//! use casegen::{Generator, Quota};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = casegen::config::discover(None)?;
//! let backend = casegen::llm::from_config(&config)?;
//! let generator = Generator::with_defaults(backend);
//!
//! let outcome = generator
//!     .generate("Users log in with email and password", &Quota::new(3, 2, 1))
//!     .await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Stable Public API
// ============================================================================

/// The generation orchestrator: batched requests, bounded retries, follow-up
/// rounds, and final normalization.
pub use casegen_engine::{GenerationOutcome, Generator, GeneratorError, GeneratorOptions};

/// A fully-normalized test-case record and its category.
pub use casegen_model::{Category, Quota, TestCaseRecord, TestData};

/// The generation backend abstraction consumed by the orchestrator.
pub use casegen_llm::{GenerationRequest, GenerationResponse, LlmBackend, LlmError};

/// Configuration with discovery and precedence:
/// CLI arguments > config file > built-in defaults.
pub use casegen_config::{Config, ConfigError};

// ============================================================================
// Internal modules - accessible but not stable
// ============================================================================

#[doc(hidden)]
pub use casegen_config as config;

#[doc(hidden)]
pub use casegen_engine as engine;

#[doc(hidden)]
pub use casegen_llm as llm;

#[doc(hidden)]
pub use casegen_model as model;

#[doc(hidden)]
pub use casegen_parse as parse;

// CLI module - internal implementation detail, not part of stable public API
#[doc(hidden)]
pub mod cli;
#[doc(hidden)]
pub mod logging;
