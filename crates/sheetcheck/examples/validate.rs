//! Example: Validate a KYC upload with sheetcheck.
//!
//! Usage:
//!   cargo run --example validate -- <file_path>
//!
//! Expects columns: Aadhaar, Phone, PIN code, Email, Name.

use std::env;
use std::path::Path;

use sheetcheck::{BuiltinRule, SheetValidator, ValidatorConfig, Verdict, rule_fn};

fn main() -> sheetcheck::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example validate -- <file_path>");
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);

    let rules = ValidatorConfig::new()
        .named_column(0, "Aadhaar", BuiltinRule::Aadhaar)
        .named_column(1, "Phone", BuiltinRule::Phone)
        .named_column(2, "PIN code", BuiltinRule::PinCode)
        .named_column(3, "Email", BuiltinRule::Email)
        .named_column(
            4,
            "Name",
            rule_fn("name", |cell| {
                let text = cell.to_text();
                Ok(if text.trim().chars().count() >= 2 {
                    Verdict::pass("Name looks fine")
                } else {
                    Verdict::fail("Name is too short")
                })
            }),
        );

    let result = SheetValidator::new().validate_path(path, &rules)?;

    let separator = "=".repeat(60);
    println!("{}", separator);
    println!("{}: {}", result.message, path.display());
    println!("{}", separator);
    println!("  Rows checked: {}", result.total_rows);
    println!("  Invalid rows: {}", result.invalid_rows);
    println!();

    for error in &result.errors {
        println!(
            "  row {:>4}  {:10} {:?}: {}",
            error.row,
            error.column_name.as_deref().unwrap_or("-"),
            error.value.to_text(),
            error.message
        );
    }

    if !result.summary.by_type.is_empty() {
        println!();
        println!("## Errors by type");
        for (kind, count) in &result.summary.by_type {
            println!("  {:>4}  {}", count, kind);
        }
    }

    Ok(())
}
