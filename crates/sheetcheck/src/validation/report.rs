//! Validation errors, summaries, and the final result.

use std::collections::{BTreeMap, HashSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::input::Cell;

/// Message on a result with no errors.
pub const SUCCESS_MESSAGE: &str = "Sheet validated successfully";

/// Message on a result with at least one error.
pub const FAILURE_MESSAGE: &str = "Validation failed";

/// Groups error messages into coarse types for the summary.
pub type Classifier = fn(&str) -> String;

/// Default classifier: the message text before its first `(`, trimmed.
///
/// Messages that start with `(` or are blank fall under `"Unknown"`.
pub fn classify_by_prefix(message: &str) -> String {
    let head = message
        .split_once('(')
        .map_or(message, |(head, _)| head)
        .trim();

    if head.is_empty() {
        "Unknown".to_string()
    } else {
        head.to_string()
    }
}

/// One cell that failed its rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// 1-based position in the full decoded row sequence, header included.
    pub row: usize,
    /// 0-based column index.
    pub column: usize,
    /// The offending cell as decoded.
    pub value: Cell,
    /// The rule's failure message, or a fault description.
    #[serde(rename = "error")]
    pub message: String,
    /// Display name of the column, when configured.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub column_name: Option<String>,
}

/// Error counts per column and per error type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    pub by_column: BTreeMap<usize, usize>,
    /// Keyed by classified type, in first-seen order.
    pub by_type: IndexMap<String, usize>,
}

/// Report for one validation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// True iff `errors` is empty.
    pub success: bool,
    pub message: String,
    /// Number of decoded rows, header included.
    pub total_rows: usize,
    /// Number of distinct rows with at least one error.
    pub invalid_rows: usize,
    /// Errors in row order, then column order.
    pub errors: Vec<ValidationError>,
    pub summary: ValidationSummary,
}

impl ValidationResult {
    /// Errors reported for one row number.
    pub fn errors_for_row(&self, row: usize) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter().filter(move |e| e.row == row)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Count errors per column and per classified type.
pub fn summarize(errors: &[ValidationError], classifier: Classifier) -> ValidationSummary {
    let mut summary = ValidationSummary::default();

    for error in errors {
        *summary.by_column.entry(error.column).or_insert(0) += 1;
        *summary.by_type.entry(classifier(&error.message)).or_insert(0) += 1;
    }

    summary
}

/// Build the final result using the default classifier.
pub fn finalize(errors: Vec<ValidationError>, total_rows: usize) -> ValidationResult {
    finalize_with(errors, total_rows, classify_by_prefix)
}

/// Build the final result with a custom classifier.
pub fn finalize_with(
    errors: Vec<ValidationError>,
    total_rows: usize,
    classifier: Classifier,
) -> ValidationResult {
    let invalid_rows = errors
        .iter()
        .map(|e| e.row)
        .collect::<HashSet<_>>()
        .len();
    let summary = summarize(&errors, classifier);
    let success = errors.is_empty();

    ValidationResult {
        success,
        message: if success { SUCCESS_MESSAGE } else { FAILURE_MESSAGE }.to_string(),
        total_rows,
        invalid_rows,
        errors,
        summary,
    }
}
