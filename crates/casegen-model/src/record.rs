//! Test-case record types
//!
//! Field names on the wire match the column headers consumed by the tabular
//! display and spreadsheet exporters: `Functionality`, `Test Summary`,
//! `Pre Condition`, `Test Data`, `Test Steps`, `Expected Result`, `Category`.

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A loosely-typed record as recovered from raw backend text, before
/// normalization.
pub type RawRecord = serde_json::Map<String, Value>;

/// Test-case category.
///
/// Parsing is case-insensitive; `as_str` is the canonical output form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Positive,
    Negative,
    Edge,
}

/// Error returned when a string does not name a known category
#[derive(Debug, Clone, Error)]
#[error("unknown test-case category '{0}'")]
pub struct CategoryParseError(pub String);

impl Category {
    /// All categories in the order batches are planned
    pub const ALL: [Category; 3] = [Category::Positive, Category::Negative, Category::Edge];

    /// Canonical display name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Positive => "Positive",
            Category::Negative => "Negative",
            Category::Edge => "Edge",
        }
    }

    /// Parse a category name, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `CategoryParseError` when the input names no known category.
    pub fn parse(s: &str) -> Result<Self, CategoryParseError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Category::Positive),
            "negative" => Ok(Category::Negative),
            "edge" => Ok(Category::Edge),
            other => Err(CategoryParseError(other.to_string())),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input values used by a test.
///
/// Either free text or a flat key-value mapping. Nested structures are
/// flattened to text on intake and never preserved.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TestData {
    #[default]
    Empty,
    Text(String),
    Pairs(Vec<(String, String)>),
}

impl TestData {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            TestData::Empty => true,
            TestData::Text(text) => text.trim().is_empty(),
            TestData::Pairs(pairs) => pairs.is_empty(),
        }
    }

    /// Flatten to a single display string: free text as-is, pairs joined as
    /// `key: value, key: value`.
    #[must_use]
    pub fn display_text(&self) -> String {
        match self {
            TestData::Empty => String::new(),
            TestData::Text(text) => text.clone(),
            TestData::Pairs(pairs) => pairs
                .iter()
                .map(|(k, v)| format!("{k}: {v}"))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Coerce an arbitrary JSON value into test data.
    ///
    /// Objects become flat pairs with scalar values stringified (nested
    /// values are flattened to their JSON text). Arrays become newline-joined
    /// text. Scalars become text. Null becomes empty.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => TestData::Empty,
            Value::String(s) if s.trim().is_empty() => TestData::Empty,
            Value::String(s) => TestData::Text(s.clone()),
            Value::Object(map) if map.is_empty() => TestData::Empty,
            Value::Object(map) => TestData::Pairs(
                map.iter()
                    .map(|(k, v)| (k.clone(), scalar_text(v)))
                    .collect(),
            ),
            Value::Array(items) if items.is_empty() => TestData::Empty,
            Value::Array(items) => TestData::Text(
                items
                    .iter()
                    .map(scalar_text)
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            other => TestData::Text(scalar_text(other)),
        }
    }
}

/// Render a JSON value as plain text: strings without quotes, everything
/// else as its JSON representation.
pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl Serialize for TestData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TestData::Empty => serializer.serialize_str(""),
            TestData::Text(text) => serializer.serialize_str(text),
            TestData::Pairs(pairs) => {
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for (k, v) in pairs {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for TestData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(TestData::from_value(&value))
    }
}

/// A fully-normalized test-case record.
///
/// After [`normalize`](crate::normalize), `functionality`, `summary`, and
/// `expected_result` are guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCaseRecord {
    #[serde(rename = "Functionality", default)]
    pub functionality: String,
    #[serde(rename = "Test Summary", default)]
    pub summary: String,
    #[serde(rename = "Pre Condition", default)]
    pub precondition: String,
    #[serde(rename = "Test Data", default)]
    pub test_data: TestData,
    #[serde(rename = "Test Steps", default)]
    pub steps: Vec<String>,
    #[serde(rename = "Expected Result", default)]
    pub expected_result: String,
    #[serde(rename = "Category", default)]
    pub category: String,
}

impl TestCaseRecord {
    /// Column headers in the fixed order consumed by the tabular display and
    /// spreadsheet exporters.
    pub const COLUMNS: [&'static str; 6] = [
        "Functionality",
        "Test Summary",
        "Pre Condition",
        "Test Data",
        "Test Steps",
        "Expected Result",
    ];

    /// Project this record onto the fixed output columns.
    ///
    /// Steps are newline-joined; test data is flattened to display text.
    #[must_use]
    pub fn to_row(&self) -> [String; 6] {
        [
            self.functionality.clone(),
            self.summary.clone(),
            self.precondition.clone(),
            self.test_data.display_text(),
            self.steps.join("\n"),
            self.expected_result.clone(),
        ]
    }
}
