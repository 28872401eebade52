//! Validate command - check, decode, and validate a file.

use std::path::PathBuf;

use colored::Colorize;
use sheetcheck::{
    DecodeOptions, SheetValidator, SheetValidatorConfig, ValidationResult, ValidatorConfig,
};

use crate::cli::{ByteSize, Delimiter};

#[allow(clippy::too_many_arguments)]
pub fn run(
    file: PathBuf,
    rule_specs: Vec<String>,
    name_specs: Vec<String>,
    no_skip_header: bool,
    max_size: ByteSize,
    delimiter: Delimiter,
    detect_delimiter: bool,
    json_output: bool,
    limit: usize,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let rules = build_rules(&rule_specs, &name_specs)?;

    let validator = SheetValidator::with_config(SheetValidatorConfig {
        decode: DecodeOptions {
            max_file_size: max_size.0,
            delimiter: delimiter.0,
            detect_delimiter,
            ..DecodeOptions::default()
        },
        skip_header_row: !no_skip_header,
    });

    if !json_output {
        println!(
            "{} {}",
            "Validating".cyan().bold(),
            file.display().to_string().white()
        );
    }

    let result = validator.validate_path(&file, &rules)?;

    if json_output {
        println!("{}", result.to_json()?);
    } else {
        print_report(&result, &rules, limit, verbose);
    }

    if result.success {
        Ok(())
    } else {
        Err(format!(
            "{} of {} rows failed validation",
            result.invalid_rows, result.total_rows
        )
        .into())
    }
}

fn build_rules(
    rule_specs: &[String],
    name_specs: &[String],
) -> Result<ValidatorConfig, sheetcheck::SheetError> {
    let mut rules = ValidatorConfig::new();

    for spec in rule_specs {
        let (column, rule) = ValidatorConfig::parse_column_spec(spec)?;
        rules = rules.column(column, rule);
    }

    for spec in name_specs {
        let (column, name) = ValidatorConfig::parse_name_spec(spec)?;
        rules = rules.with_column_name(column, name);
    }

    Ok(rules)
}

fn print_report(result: &ValidationResult, rules: &ValidatorConfig, limit: usize, verbose: bool) {
    if verbose {
        println!();
        println!("{}", "Rules:".yellow().bold());
        for (column, rule) in rules.rules() {
            let name = rules.column_name(column).unwrap_or("");
            println!("  {:>4}  {:12} {}", column, rule.name(), name);
        }
    }

    println!(
        "Checked {} rows, {} invalid",
        result.total_rows.to_string().white().bold(),
        if result.invalid_rows == 0 {
            result.invalid_rows.to_string().green()
        } else {
            result.invalid_rows.to_string().red()
        }
    );

    if result.success {
        println!("{}", result.message.green().bold());
        return;
    }

    println!();
    println!("{}", "Errors:".yellow().bold());
    for error in result.errors.iter().take(limit) {
        let column = match &error.column_name {
            Some(name) => format!("{} ({})", error.column, name),
            None => error.column.to_string(),
        };
        println!(
            "  row {:>5}  column {:12} {:20} {}",
            error.row,
            column,
            format!("{:?}", error.value.to_text()).dimmed(),
            error.message.red()
        );
    }
    if result.errors.len() > limit {
        println!(
            "  ... and {} more (use --limit or --json to see all)",
            result.errors.len() - limit
        );
    }

    println!();
    println!("{}", "By type:".yellow().bold());
    for (kind, count) in &result.summary.by_type {
        println!("  {:>5}  {}", count, kind);
    }

    println!("{}", "By column:".yellow().bold());
    for (column, count) in &result.summary.by_column {
        let name = rules.column_name(*column).unwrap_or("");
        println!("  {:>5}  column {} {}", count, column, name);
    }

    println!();
    println!("{}", result.message.red().bold());
}
