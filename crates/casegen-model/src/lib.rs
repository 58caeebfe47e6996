//! Data model for casegen test-case records
//!
//! This crate defines the record schema shared by the orchestrator, parser,
//! and output layers, plus the normalizer that completes partially-specified
//! records into the full schema.

mod normalize;
mod quota;
mod record;

pub use normalize::{FIELD_ALIASES, normalize};
pub use quota::{Progress, Quota, Shortfall};
pub use record::{Category, CategoryParseError, RawRecord, TestCaseRecord, TestData};
