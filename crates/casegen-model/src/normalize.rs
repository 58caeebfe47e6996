//! Record normalization
//!
//! Completes a loosely-typed record into the full schema: alias resolution
//! through a single declarative table, type coercion, and deterministic
//! synthesis of required fields that are still empty. Normalization is total
//! and idempotent: synthesis only triggers on emptiness, and alias resolution
//! always prefers the canonical field name first.

use serde_json::Value;

use crate::record::{Category, RawRecord, TestCaseRecord, TestData, scalar_text};

/// Canonical fields and their accepted aliases, in resolution order.
///
/// The backend drifts between synonyms ("Test Steps" vs "Steps"); every
/// lookup goes through this table so drift tolerance lives in one place.
/// The first entry of each list is the canonical serialized name.
pub const FIELD_ALIASES: &[(&str, &[&str])] = &[
    ("functionality", &["Functionality", "Function", "Feature", "Module"]),
    (
        "summary",
        &["Test Summary", "Summary", "Test Case Summary", "Description"],
    ),
    (
        "precondition",
        &["Pre Condition", "Precondition", "Pre-Condition", "Prerequisite"],
    ),
    ("test_data", &["Test Data", "TestData", "Input Data", "Data"]),
    ("steps", &["Test Steps", "TestSteps", "Steps", "Procedure"]),
    (
        "expected_result",
        &["Expected Result", "ExpectedResult", "Expected", "Expected Outcome"],
    ),
    ("category", &["Category", "Test Type", "Type"]),
];

fn aliases_for(field: &str) -> &'static [&'static str] {
    FIELD_ALIASES
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, aliases)| *aliases)
        .unwrap_or(&[])
}

/// Resolve a field against the alias table: first present, non-null value
/// wins. Key comparison ignores case and surrounding whitespace.
fn resolve<'a>(raw: &'a RawRecord, field: &str) -> Option<&'a Value> {
    for alias in aliases_for(field) {
        for (key, value) in raw {
            if key.trim().eq_ignore_ascii_case(alias) && !value.is_null() {
                return Some(value);
            }
        }
    }
    None
}

fn text_field(raw: &RawRecord, field: &str) -> String {
    resolve(raw, field)
        .map(|v| scalar_text(v).trim().to_string())
        .unwrap_or_default()
}

/// Coerce a value into an ordered step list. Arrays keep one step per
/// element; scalar text splits on newlines.
fn steps_field(raw: &RawRecord) -> Vec<String> {
    let Some(value) = resolve(raw, "steps") else {
        return Vec::new();
    };
    match value {
        Value::Array(items) => items
            .iter()
            .map(|v| scalar_text(v).trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        other => scalar_text(other)
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect(),
    }
}

/// First clause of a sentence: the text before the first clause separator.
fn first_clause(text: &str) -> &str {
    text.split(['.', ',', ';', ':'])
        .next()
        .unwrap_or(text)
        .trim()
}

/// Complete a raw record into the full schema.
///
/// Total function; never fails. `index` is the record's 1-based position in
/// the assembled run and is only used for the positional placeholder when
/// both functionality and summary are absent.
#[must_use]
pub fn normalize(raw: &RawRecord, index: usize) -> TestCaseRecord {
    let mut functionality = text_field(raw, "functionality");
    let mut summary = text_field(raw, "summary");
    let precondition = text_field(raw, "precondition");
    let test_data = resolve(raw, "test_data")
        .map(TestData::from_value)
        .unwrap_or_default();
    let steps = steps_field(raw);
    let mut expected_result = text_field(raw, "expected_result");
    let category = match Category::parse(&text_field(raw, "category")) {
        Ok(category) => category.as_str().to_string(),
        Err(_) => text_field(raw, "category"),
    };

    if functionality.is_empty() {
        // A summary of bare punctuation yields an empty clause; fall through
        // to the positional placeholder rather than an empty functionality.
        functionality = match first_clause(&summary) {
            "" => format!("Test Case {index}"),
            clause => clause.to_string(),
        };
    }
    if summary.is_empty() {
        summary = match steps.first() {
            Some(first) => format!("Verify {functionality}: {first}"),
            None => format!("Verify {functionality}"),
        };
    }
    if expected_result.is_empty() {
        expected_result = match steps.last() {
            Some(last) => {
                format!("After performing the steps, the system should {last}")
            }
            None => format!("{functionality} should behave as expected"),
        };
    }

    TestCaseRecord {
        functionality,
        summary,
        precondition,
        test_data,
        steps,
        expected_result,
        category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawRecord {
        value.as_object().expect("object literal").clone()
    }

    fn renormalize(record: &TestCaseRecord, index: usize) -> TestCaseRecord {
        let value = serde_json::to_value(record).unwrap();
        normalize(&raw(value), index)
    }

    #[test]
    fn resolves_canonical_names_first() {
        let record = raw(json!({
            "Steps": ["from alias"],
            "Test Steps": ["from canonical"],
        }));
        let normalized = normalize(&record, 1);
        assert_eq!(normalized.steps, vec!["from canonical"]);
    }

    #[test]
    fn resolves_aliases_case_insensitively() {
        let record = raw(json!({
            "functionality": "Login",
            "test summary": "Valid login",
            "expected result": "Dashboard shown",
        }));
        let normalized = normalize(&record, 1);
        assert_eq!(normalized.functionality, "Login");
        assert_eq!(normalized.summary, "Valid login");
        assert_eq!(normalized.expected_result, "Dashboard shown");
    }

    #[test]
    fn fills_given_fields_and_leaves_rest_empty() {
        // Bracket-extraction scenario: only three fields present.
        let record = raw(json!({
            "Functionality": "Login",
            "Test Summary": "Valid login",
            "Expected Result": "Dashboard shown",
        }));
        let normalized = normalize(&record, 1);
        assert_eq!(normalized.functionality, "Login");
        assert_eq!(normalized.summary, "Valid login");
        assert_eq!(normalized.expected_result, "Dashboard shown");
        assert_eq!(normalized.category, "");
        assert_eq!(normalized.precondition, "");
        assert!(normalized.steps.is_empty());
        assert!(normalized.test_data.is_empty());
    }

    #[test]
    fn synthesizes_summary_from_functionality() {
        let record = raw(json!({"Functionality": "Login"}));
        let normalized = normalize(&record, 1);
        assert_eq!(normalized.summary, "Verify Login");
        assert_eq!(normalized.expected_result, "Login should behave as expected");
    }

    #[test]
    fn synthesizes_summary_and_expected_from_steps() {
        let record = raw(json!({
            "Functionality": "Login",
            "Test Steps": ["Open the login page", "Submit valid credentials"],
        }));
        let normalized = normalize(&record, 1);
        assert_eq!(normalized.summary, "Verify Login: Open the login page");
        assert_eq!(
            normalized.expected_result,
            "After performing the steps, the system should Submit valid credentials"
        );
    }

    #[test]
    fn synthesizes_functionality_from_summary_first_clause() {
        let record = raw(json!({
            "Test Summary": "Password reset, with an expired token",
        }));
        let normalized = normalize(&record, 1);
        assert_eq!(normalized.functionality, "Password reset");
    }

    #[test]
    fn synthesizes_positional_placeholder_when_nothing_present() {
        let normalized = normalize(&RawRecord::new(), 4);
        assert_eq!(normalized.functionality, "Test Case 4");
        assert_eq!(normalized.summary, "Verify Test Case 4");
        assert_eq!(
            normalized.expected_result,
            "Test Case 4 should behave as expected"
        );
    }

    #[test]
    fn canonicalizes_known_category_case() {
        let record = raw(json!({"Functionality": "F", "Category": "negative"}));
        assert_eq!(normalize(&record, 1).category, "Negative");
    }

    #[test]
    fn keeps_unknown_category_as_is() {
        let record = raw(json!({"Functionality": "F", "Category": "smoke"}));
        assert_eq!(normalize(&record, 1).category, "smoke");
    }

    #[test]
    fn coerces_scalar_steps_to_line_list() {
        let record = raw(json!({
            "Functionality": "F",
            "Test Steps": "1. Open page\n2. Submit",
        }));
        let normalized = normalize(&record, 1);
        assert_eq!(normalized.steps, vec!["1. Open page", "2. Submit"]);
    }

    #[test]
    fn normalize_is_idempotent_on_sparse_record() {
        let record = raw(json!({
            "Summary": "Lockout after failures",
            "Steps": ["Fail login three times"],
        }));
        let once = normalize(&record, 7);
        assert_eq!(renormalize(&once, 7), once);
    }

    #[test]
    fn normalize_is_idempotent_on_full_record() {
        let record = raw(json!({
            "Functionality": "Login",
            "Test Summary": "Valid login",
            "Pre Condition": "Account exists",
            "Test Data": {"user": "alice"},
            "Test Steps": ["Open page", "Submit"],
            "Expected Result": "Dashboard shown",
            "Category": "Positive",
        }));
        let once = normalize(&record, 1);
        assert_eq!(renormalize(&once, 1), once);
    }
}
