//! Row and sheet validation.

use tracing::debug;

use crate::input::{Cell, ParsedRow, cell_at};

use super::config::ValidatorConfig;
use super::report::{ValidationError, ValidationResult, finalize_with};

/// Apply the configured rules to one row.
///
/// A rule that faults is reported as an error on its cell; the remaining
/// columns are still checked.
pub fn validate_row(row: &[Cell], config: &ValidatorConfig, row_number: usize) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (column, rule) in config.rules() {
        let value = cell_at(row, column);

        let message = match rule.evaluate(value) {
            Ok(verdict) if verdict.valid => continue,
            Ok(verdict) => verdict.message.into_owned(),
            Err(fault) => {
                debug!(row = row_number, column, rule = rule.name(), %fault, "rule faulted");
                format!("Validation error: {}", fault)
            }
        };

        errors.push(ValidationError {
            row: row_number,
            column,
            value: value.clone(),
            message,
            column_name: config.column_name(column).map(str::to_string),
        });
    }

    errors
}

/// Validate every row, optionally skipping the first.
///
/// Row numbers are 1-based positions in `rows`, so skipping the header does
/// not renumber anything.
pub fn validate_all_rows(
    rows: &[ParsedRow],
    config: &ValidatorConfig,
    skip_header_row: bool,
) -> Vec<ValidationError> {
    let start = usize::from(skip_header_row);

    rows.iter()
        .enumerate()
        .skip(start)
        .flat_map(|(index, row)| validate_row(row, config, index + 1))
        .collect()
}

/// Validate a decoded sheet and summarize the outcome.
pub fn validate_sheet(
    rows: &[ParsedRow],
    config: &ValidatorConfig,
    skip_header_row: bool,
) -> ValidationResult {
    if rows.is_empty() {
        return finalize_with(Vec::new(), 0, config.classifier());
    }

    let errors = validate_all_rows(rows, config, skip_header_row);
    debug!(
        rows = rows.len(),
        columns = config.len(),
        errors = errors.len(),
        "validated sheet"
    );

    finalize_with(errors, rows.len(), config.classifier())
}
