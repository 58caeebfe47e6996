//! Prompt construction for generation requests
//!
//! Every prompt embeds the record schema and pins the expected output shape
//! to a bare JSON array; the backend routinely ignores both, which is what
//! the parser's fallback chain is for.

use casegen_model::{Category, Shortfall};

/// System-level instruction sent with every generation request.
pub const SYSTEM_PROMPT: &str =
    "You are a QA expert who creates comprehensive test cases with detailed steps.";

/// Field names and types as they must appear in each generated object.
const SCHEMA_DESCRIPTION: &str = "- Functionality (string): short label for the feature under test\n\
     - Test Summary (string): one-line description of what the test verifies\n\
     - Pre Condition (string): state required before the test executes\n\
     - Test Data (string or flat key-value object): input values used by the test\n\
     - Test Steps (array of strings): ordered instructions\n\
     - Expected Result (string): observable outcome indicating pass/fail\n\
     - Category (string)";

/// Build the prompt for one homogeneous-category batch.
#[must_use]
pub fn batch_prompt(requirement: &str, category: Category, count: u32) -> String {
    format!(
        "Generate exactly {count} {category} test cases as a JSON array for the requirement below.\n\n\
         IMPORTANT:\n\
         - Output ONLY a JSON array, NO explanation, NO markdown.\n\
         - Each object must have these fields:\n{SCHEMA_DESCRIPTION}\n\
         - Every test's Category must be \"{category}\"\n\n\
         Requirement:\n{requirement}"
    )
}

/// Build the combined prompt for one follow-up round, requesting only the
/// outstanding missing counts per category.
#[must_use]
pub fn followup_prompt(requirement: &str, shortfall: &Shortfall) -> String {
    let wanted: Vec<String> = Category::ALL
        .into_iter()
        .filter(|category| shortfall.get(*category) > 0)
        .map(|category| format!("{} {}", shortfall.get(category), category))
        .collect();

    format!(
        "Generate additional test cases as a JSON array for the requirement below. \
         Still needed: {}.\n\n\
         IMPORTANT:\n\
         - Output ONLY a JSON array, NO explanation, NO markdown.\n\
         - Each object must have these fields:\n{SCHEMA_DESCRIPTION}\n\
         - Set each test's Category to exactly one of \"Positive\", \"Negative\", or \"Edge\".\n\n\
         Requirement:\n{}",
        wanted.join(", "),
        requirement
    )
}
