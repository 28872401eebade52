//! Property-based tests for sheetcheck.
//!
//! These tests use proptest to generate random inputs and verify that the
//! decoder and validation engine keep their invariants under all conditions.
//!
//! # Testing Philosophy
//!
//! Property-based tests verify:
//! 1. **No panics**: Decoding and rules never crash on any input
//! 2. **Determinism**: Same rows and rules always produce the same result
//! 3. **Invariants**: Row counts and ordering always hold
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p sheetcheck --test property_tests
//!
//! # Run with more cases (slower but more thorough)
//! PROPTEST_CASES=10000 cargo test -p sheetcheck --test property_tests
//! ```

use std::collections::HashSet;

use proptest::prelude::*;

use sheetcheck::{
    BuiltinRule, Cell, ParsedRow, RawFile, ValidatorConfig, check_input, decode_delimited_text,
    validate_sheet,
};

// =============================================================================
// Test Strategies
// =============================================================================

/// Cells that look like the values people actually upload.
fn cell_value() -> impl Strategy<Value = Cell> {
    prop_oneof![
        "[0-9]{5,13}".prop_map(Cell::from),
        "[6-9][0-9]{9}".prop_map(Cell::from),
        "[a-z]{1,8}@[a-z]{1,8}\\.[a-z]{2,3}".prop_map(Cell::from),
        "[a-zA-Z0-9 @.]{0,15}".prop_map(Cell::from),
        (-1e6f64..1e6).prop_map(Cell::Number),
        Just(Cell::Empty),
    ]
}

fn arb_rows() -> impl Strategy<Value = Vec<ParsedRow>> {
    prop::collection::vec(prop::collection::vec(cell_value(), 0..6), 0..25)
}

fn arb_rule() -> impl Strategy<Value = BuiltinRule> {
    prop::sample::select(BuiltinRule::ALL.to_vec())
}

fn arb_config() -> impl Strategy<Value = ValidatorConfig> {
    prop::collection::btree_map(0usize..8, arb_rule(), 0..6).prop_map(|rules| {
        rules
            .into_iter()
            .fold(ValidatorConfig::new(), |config, (index, rule)| config.column(index, rule))
    })
}

// =============================================================================
// Engine invariants
// =============================================================================

proptest! {
    #[test]
    fn invalid_rows_counts_distinct_rows(sheet in arb_rows(), rules in arb_config(), skip in any::<bool>()) {
        let result = validate_sheet(&sheet, &rules, skip);

        let distinct: HashSet<usize> = result.errors.iter().map(|e| e.row).collect();
        prop_assert_eq!(result.invalid_rows, distinct.len());

        let validated = sheet.len().saturating_sub(usize::from(skip));
        prop_assert!(result.invalid_rows <= validated);
        prop_assert_eq!(result.total_rows, sheet.len());
        prop_assert_eq!(result.success, result.errors.is_empty());
    }

    #[test]
    fn errors_ordered_by_row_then_column(sheet in arb_rows(), rules in arb_config()) {
        let result = validate_sheet(&sheet, &rules, true);

        let positions: Vec<(usize, usize)> = result.errors.iter().map(|e| (e.row, e.column)).collect();
        let mut sorted = positions.clone();
        sorted.sort();
        prop_assert_eq!(positions, sorted);
        prop_assert!(result.errors.iter().all(|e| e.row >= 2));
    }

    #[test]
    fn validation_is_deterministic(sheet in arb_rows(), rules in arb_config(), skip in any::<bool>()) {
        prop_assert_eq!(
            validate_sheet(&sheet, &rules, skip),
            validate_sheet(&sheet, &rules, skip)
        );
    }

    #[test]
    fn summary_totals_match_error_count(sheet in arb_rows(), rules in arb_config()) {
        let result = validate_sheet(&sheet, &rules, false);

        prop_assert_eq!(result.summary.by_column.values().sum::<usize>(), result.errors.len());
        prop_assert_eq!(result.summary.by_type.values().sum::<usize>(), result.errors.len());
    }
}

// =============================================================================
// Rules
// =============================================================================

proptest! {
    #[test]
    fn rules_never_panic(value in "\\PC{0,40}") {
        let cell = Cell::from(value);
        for rule in BuiltinRule::ALL {
            let _ = rule.verdict(&cell);
        }
    }

    #[test]
    fn spaced_digits_match_compact_digits(digits in "[0-9]{4,14}", gap in 1usize..4) {
        let spaced: String = digits
            .chars()
            .enumerate()
            .flat_map(|(i, c)| {
                let pad = if i > 0 && i % gap == 0 { Some(' ') } else { None };
                pad.into_iter().chain(std::iter::once(c))
            })
            .collect();

        for rule in [BuiltinRule::Aadhaar, BuiltinRule::Phone, BuiltinRule::PinCode] {
            prop_assert_eq!(
                rule.check(&Cell::from(digits.as_str())),
                rule.check(&Cell::from(spaced.as_str()))
            );
        }
    }

    #[test]
    fn valid_aadhaar_shape_always_passes(value in "[2-9][0-9]{11}") {
        prop_assert!(BuiltinRule::Aadhaar.check(&Cell::from(value)));
    }

    #[test]
    fn phone_rejects_leading_digits_below_six(value in "[0-5][0-9]{9}") {
        prop_assert!(!BuiltinRule::Phone.check(&Cell::from(value)));
    }
}

// =============================================================================
// Input guard and decoder
// =============================================================================

proptest! {
    #[test]
    fn oversized_files_always_rejected(size in 1usize..4096, max in 0u64..4096) {
        let file = RawFile::new("upload.csv", vec![b'a'; size]);
        let verdict = check_input(Some(&file), max);
        prop_assert_eq!(verdict.is_err(), size as u64 > max);
    }

    #[test]
    fn decoder_never_panics(content in "\\PC{0,200}") {
        let _ = decode_delimited_text(&content);
    }

    #[test]
    fn decoded_csv_cells_are_text(content in "[a-z0-9,\n ]{0,120}") {
        let rows = decode_delimited_text(&content).unwrap();
        for row in rows {
            prop_assert!(row.iter().all(|cell| matches!(cell, Cell::Text(_))));
        }
    }
}
