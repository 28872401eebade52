//! Validation engine: rules, per-column configuration, and reporting.

mod config;
mod engine;
mod report;
mod rules;

pub use config::ValidatorConfig;
pub use engine::{validate_all_rows, validate_row, validate_sheet};
pub use report::{
    Classifier, FAILURE_MESSAGE, SUCCESS_MESSAGE, ValidationError, ValidationResult,
    ValidationSummary, classify_by_prefix, finalize, finalize_with, summarize,
};
pub use rules::{BuiltinRule, FnRule, Rule, RuleFault, Verdict, rule_fn};
