//! Fuzz target for the file decoder.
//!
//! This fuzzer tests that decoding:
//! 1. Never panics on malformed CSV text or workbook bytes
//! 2. Either fails with an error or yields rows the engine accepts

#![no_main]

use libfuzzer_sys::fuzz_target;
use sheetcheck::{BuiltinRule, RawFile, SheetValidator, ValidatorConfig};

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    let rules = ValidatorConfig::new()
        .column(0, BuiltinRule::Required)
        .column(1, BuiltinRule::Numeric)
        .column(2, BuiltinRule::Email);
    let validator = SheetValidator::new();

    for name in ["upload.csv", "upload.xlsx", "upload.xls"] {
        let file = RawFile::new(name, data.to_vec());
        if let Ok(result) = validator.validate_file(&file, &rules) {
            assert!(result.invalid_rows <= result.total_rows);
        }
    }
});
