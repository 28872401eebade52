//! Fuzz target for the built-in rules.
//!
//! This fuzzer tests that every rule:
//! 1. Never panics on any input
//! 2. Always returns one of its two fixed messages

#![no_main]

use libfuzzer_sys::fuzz_target;
use sheetcheck::{BuiltinRule, Cell};

fuzz_target!(|data: &[u8]| {
    let cell = Cell::from(String::from_utf8_lossy(data).into_owned());

    for rule in BuiltinRule::ALL {
        let verdict = rule.verdict(&cell);
        let expected = if verdict.valid {
            rule.success_message()
        } else {
            rule.failure_message()
        };
        assert_eq!(verdict.message, expected);
    }
});
