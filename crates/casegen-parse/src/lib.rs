//! Layered fallback parsing of raw generation output
//!
//! The backend's text is untyped and unreliable: sometimes a clean JSON
//! array, sometimes JSON buried in prose or code fences, sometimes a
//! markdown table. Recovery is an ordered chain of pure stages, each tried
//! only when the one before it fails, short-circuiting on first success.
//!
//! Every successful parse yields a non-empty sequence of key-value objects;
//! a single bare object is wrapped so callers never special-case singular
//! output.

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub use casegen_model::RawRecord;

/// Raw text matched no parsing stage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("response text did not match any parsing strategy")]
    Unparsable,
}

type Stage = fn(&str) -> Option<Vec<RawRecord>>;

/// Fallback stages in attempt order.
const STAGES: &[(&str, Stage)] = &[
    ("direct", parse_direct),
    ("bracket", parse_bracketed),
    ("table", parse_table),
];

/// Recover record-shaped objects from raw backend text.
///
/// Empty or whitespace-only input is unparsable without attempting any
/// stage.
///
/// # Errors
///
/// Returns [`ParseError::Unparsable`] when no stage recovers at least one
/// object.
pub fn parse(raw: &str) -> Result<Vec<RawRecord>, ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Unparsable);
    }

    for (name, stage) in STAGES {
        if let Some(records) = stage(trimmed) {
            debug!(stage = name, records = records.len(), "parsed raw response");
            return Ok(records);
        }
    }
    Err(ParseError::Unparsable)
}

/// Interpret a decoded JSON value as a record sequence.
///
/// Arrays keep only their object elements; an array with none fails. A bare
/// object becomes a one-element sequence.
fn records_from_value(value: Value) -> Option<Vec<RawRecord>> {
    match value {
        Value::Array(items) => {
            let records: Vec<RawRecord> = items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(map) => Some(map),
                    _ => None,
                })
                .collect();
            if records.is_empty() { None } else { Some(records) }
        }
        Value::Object(map) => Some(vec![map]),
        _ => None,
    }
}

/// Stage 1: the entire text is a structured document.
fn parse_direct(text: &str) -> Option<Vec<RawRecord>> {
    serde_json::from_str::<Value>(text)
        .ok()
        .and_then(records_from_value)
}

/// Stage 2: structured data embedded in prose or code fences. Slice from
/// the first `[` to the last `]` and parse the slice directly.
fn parse_bracketed(text: &str) -> Option<Vec<RawRecord>> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end <= start {
        return None;
    }
    parse_direct(&text[start..=end])
}

/// Stage 3: lines containing `|` form a delimited table; the first row is
/// the header, separator rows are skipped.
fn parse_table(text: &str) -> Option<Vec<RawRecord>> {
    let rows: Vec<Vec<String>> = text
        .lines()
        .map(|line| line.trim().trim_matches('`').trim())
        .filter(|line| line.contains('|'))
        .map(split_table_row)
        .filter(|cells| !is_separator_row(cells))
        .collect();

    let (header, data) = rows.split_first()?;
    if header.iter().all(String::is_empty) || data.is_empty() {
        return None;
    }

    let records: Vec<RawRecord> = data
        .iter()
        .map(|cells| {
            header
                .iter()
                .zip(cells.iter())
                .filter(|(name, _)| !name.is_empty())
                .map(|(name, cell)| (name.clone(), Value::String(cell.clone())))
                .collect()
        })
        .collect();

    if records.is_empty() { None } else { Some(records) }
}

fn split_table_row(line: &str) -> Vec<String> {
    line.trim_matches('|')
        .split('|')
        .map(|cell| cell.trim().to_string())
        .collect()
}

/// A markdown alignment row: every cell is only dashes, colons, or spaces.
fn is_separator_row(cells: &[String]) -> bool {
    !cells.is_empty()
        && cells
            .iter()
            .all(|cell| !cell.is_empty() && cell.chars().all(|c| matches!(c, '-' | ':' | ' ')))
}
