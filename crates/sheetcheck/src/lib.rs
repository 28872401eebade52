//! sheetcheck: rule-based cell validation for uploaded CSV and Excel files.
//!
//! A file passes through three stages: an input guard that refuses empty,
//! oversized, or unsupported files; a decoder that turns CSV text or the first
//! sheet of a workbook into rows; and a validation engine that applies one
//! rule per configured column and reports every failing cell.
//!
//! # Example
//!
//! ```no_run
//! use sheetcheck::{BuiltinRule, SheetValidator, ValidatorConfig};
//!
//! let rules = ValidatorConfig::new()
//!     .column(0, BuiltinRule::Aadhaar)
//!     .column(1, BuiltinRule::Phone);
//!
//! let result = SheetValidator::new()
//!     .validate_path("contacts.csv", &rules)
//!     .unwrap();
//!
//! println!("{} of {} rows invalid", result.invalid_rows, result.total_rows);
//! ```

pub mod error;
pub mod input;
pub mod validation;

mod sheet;

pub use crate::sheet::{SheetValidator, SheetValidatorConfig};
pub use error::{InputRejection, Result, SheetError};
pub use input::{
    Cell, DecodeOptions, Decoder, FileFormat, ParsedRow, RawFile, check_input, check_path, decode,
    decode_delimited_text, decode_spreadsheet,
};
pub use validation::{
    BuiltinRule, Rule, RuleFault, ValidationError, ValidationResult, ValidationSummary,
    ValidatorConfig, Verdict, rule_fn, validate_row, validate_sheet,
};
