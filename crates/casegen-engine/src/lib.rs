//! Generation orchestrator
//!
//! The core control loop: drives batched requests through a generation
//! backend, parses each response via the layered fallback parser, accumulates
//! records per category, issues follow-up requests scoped to the still-missing
//! quota, and normalizes every record on final assembly.
//!
//! The backend is non-deterministic and partially reliable by nature, so the
//! policy throughout is graceful degradation rather than hard failure: a
//! stuck batch is skipped after a bounded retry budget, a shortfall is a
//! degraded success, and only a run that never accepted a single record
//! surfaces raw text for manual inspection.

mod batch;
mod prompt;

pub use prompt::{SYSTEM_PROMPT, batch_prompt, followup_prompt};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use casegen_llm::{GenerationRequest, LlmBackend};
use casegen_model::{Category, Progress, Quota, RawRecord, TestCaseRecord, normalize};

use crate::batch::{BatchPlan, BatchState, plan_batches};

/// Tunable policy for one orchestration run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorOptions {
    /// Sampling temperature for generation calls
    pub temperature: f32,
    /// Response-length budget for generation calls
    pub max_output_tokens: u32,
    /// Batch size for Positive/Negative categories
    pub batch_size: u32,
    /// Batch size for the Edge category
    pub edge_batch_size: u32,
    /// Attempts per batch before it is abandoned
    pub max_batch_attempts: u32,
    /// Combined follow-up rounds after the bulk batches
    pub followup_rounds: u32,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            temperature: casegen_llm::DEFAULT_TEMPERATURE,
            max_output_tokens: casegen_llm::DEFAULT_MAX_OUTPUT_TOKENS,
            batch_size: 5,
            edge_batch_size: 3,
            max_batch_attempts: 3,
            followup_rounds: 2,
        }
    }
}

/// Result of one orchestration run.
///
/// The two shapes are deliberately a tagged union: a run either produced
/// records (possibly short of quota) or nothing at all, in which case the
/// last raw unparsed text is surfaced so the caller has something
/// inspectable.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    /// Normalized records, in acceptance order
    Records(Vec<TestCaseRecord>),
    /// No record was ever accepted; the raw text of the last unparsable
    /// response
    Unparsed(String),
}

impl GenerationOutcome {
    /// The records, when the run produced any.
    #[must_use]
    pub fn records(&self) -> Option<&[TestCaseRecord]> {
        match self {
            GenerationOutcome::Records(records) => Some(records),
            GenerationOutcome::Unparsed(_) => None,
        }
    }
}

/// Errors that abort a run before any generation is attempted.
///
/// Recoverable backend and parse failures never surface here; they are
/// absorbed by the retry and follow-up budgets.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("requirement text is empty")]
    EmptyRequirement,
}

/// The generation orchestrator.
///
/// Owns a backend for its lifetime; each [`generate`](Generator::generate)
/// call owns its progress accounting exclusively and discards it on return.
pub struct Generator {
    backend: Box<dyn LlmBackend>,
    options: GeneratorOptions,
}

impl Generator {
    #[must_use]
    pub fn new(backend: Box<dyn LlmBackend>, options: GeneratorOptions) -> Self {
        Self { backend, options }
    }

    #[must_use]
    pub fn with_defaults(backend: Box<dyn LlmBackend>) -> Self {
        Self::new(backend, GeneratorOptions::default())
    }

    /// Generate test-case records for `requirement_text` against `quota`.
    ///
    /// Issues one backend call at a time: bulk per-category batches first,
    /// then up to two combined follow-up rounds for whatever is still
    /// missing. Returns accumulated records even when short of quota.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::EmptyRequirement`] when the requirement is
    /// empty or whitespace-only. No other condition fails the run.
    pub async fn generate(
        &self,
        requirement_text: &str,
        quota: &Quota,
    ) -> Result<GenerationOutcome, GeneratorError> {
        let requirement = requirement_text.trim();
        if requirement.is_empty() {
            return Err(GeneratorError::EmptyRequirement);
        }

        let mut accumulated: Vec<RawRecord> = Vec::new();
        let mut progress = Progress::default();
        let mut last_raw: Option<String> = None;

        for plan in plan_batches(quota, self.options.batch_size, self.options.edge_batch_size) {
            info!(
                category = %plan.category,
                count = plan.count,
                "Generating test cases"
            );
            if let Some(mut records) = self.run_batch(requirement, plan, &mut last_raw).await {
                // The batch is category-homogeneous by construction, so the
                // requested category overrides whatever the backend claimed.
                let accepted = records.len() as u32;
                for record in &mut records {
                    record.insert(
                        "Category".to_string(),
                        Value::String(plan.category.as_str().to_string()),
                    );
                }
                progress.record(plan.category, accepted);
                accumulated.append(&mut records);
            }
        }

        let mut shortfall = progress.shortfall(quota);
        for round in 1..=self.options.followup_rounds {
            if shortfall.is_zero() {
                break;
            }
            info!(
                round,
                missing = shortfall.total(),
                "Requesting follow-up round for missing test cases"
            );
            let prompt = prompt::followup_prompt(requirement, &shortfall);
            if let Some(records) = self.attempt(&prompt, &mut last_raw).await {
                for mut record in records {
                    // Attribute each record as it is accepted, against the
                    // deficit remaining at that moment.
                    let current = progress.shortfall(quota);
                    let category = claimed_category(&record)
                        .filter(|c| current.get(*c) > 0)
                        .or_else(|| current.largest())
                        .unwrap_or(Category::Positive);
                    record.insert(
                        "Category".to_string(),
                        Value::String(category.as_str().to_string()),
                    );
                    progress.record(category, 1);
                    accumulated.push(record);
                }
            }
            shortfall = progress.shortfall(quota);
        }

        if !shortfall.is_zero() {
            warn!(
                missing = shortfall.total(),
                accepted = progress.total(),
                "Quota shortfall after all rounds; returning partial result"
            );
        }

        if accumulated.is_empty() {
            return Ok(GenerationOutcome::Unparsed(last_raw.unwrap_or_default()));
        }

        let records = accumulated
            .iter()
            .enumerate()
            .map(|(index, raw)| normalize(raw, index + 1))
            .collect();
        Ok(GenerationOutcome::Records(records))
    }

    /// Drive one batch through its bounded retry state machine.
    async fn run_batch(
        &self,
        requirement: &str,
        plan: BatchPlan,
        last_raw: &mut Option<String>,
    ) -> Option<Vec<RawRecord>> {
        let prompt = prompt::batch_prompt(requirement, plan.category, plan.count);
        let mut state = BatchState::Attempting(1);
        let mut parsed: Option<Vec<RawRecord>> = None;

        loop {
            match state {
                BatchState::Attempting(attempt) => {
                    debug!(
                        category = %plan.category,
                        count = plan.count,
                        attempt,
                        "Attempting batch"
                    );
                    match self.attempt(&prompt, last_raw).await {
                        Some(records) => {
                            debug!(
                                category = %plan.category,
                                records = records.len(),
                                "Batch parsed"
                            );
                            parsed = Some(records);
                            state = BatchState::Succeeded;
                        }
                        None => state = state.failed(self.options.max_batch_attempts),
                    }
                }
                BatchState::Succeeded => return parsed,
                BatchState::ExhaustedRetries => {
                    warn!(
                        category = %plan.category,
                        count = plan.count,
                        attempts = self.options.max_batch_attempts,
                        "Batch abandoned after retry budget; continuing with other batches"
                    );
                    return None;
                }
            }
        }
    }

    /// One backend call plus parse. Backend failures and unparsable text are
    /// equivalent for retry purposes; unparsable text is kept as the run's
    /// diagnostic payload.
    async fn attempt(&self, prompt: &str, last_raw: &mut Option<String>) -> Option<Vec<RawRecord>> {
        let request = GenerationRequest::new(prompt)
            .with_system(SYSTEM_PROMPT)
            .with_temperature(self.options.temperature)
            .with_max_output_tokens(self.options.max_output_tokens);

        let response = match self.backend.generate(request).await {
            Ok(response) => response,
            Err(error) => {
                warn!(error = %error, "Generation backend call failed");
                return None;
            }
        };

        if response.text.trim().is_empty() {
            warn!("Generation backend returned empty text");
            return None;
        }

        match casegen_parse::parse(&response.text) {
            Ok(records) => Some(records),
            Err(_) => {
                debug!(
                    bytes = response.text.len(),
                    "Response did not parse; keeping raw text for diagnostics"
                );
                *last_raw = Some(response.text);
                None
            }
        }
    }
}

/// The category a record claims for itself, when it names a known one.
fn claimed_category(record: &RawRecord) -> Option<Category> {
    const CATEGORY_KEYS: [&str; 3] = ["Category", "Test Type", "Type"];
    record.iter().find_map(|(key, value)| {
        let key = key.trim();
        if CATEGORY_KEYS.iter().any(|k| key.eq_ignore_ascii_case(k)) {
            value.as_str().and_then(|s| Category::parse(s).ok())
        } else {
            None
        }
    })
}
