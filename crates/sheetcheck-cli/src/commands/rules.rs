//! Rules command - list the built-in rules.

use colored::Colorize;
use serde::Serialize;
use sheetcheck::BuiltinRule;

#[derive(Serialize)]
struct RuleInfo {
    name: &'static str,
    description: &'static str,
    success_message: &'static str,
    failure_message: &'static str,
}

impl From<BuiltinRule> for RuleInfo {
    fn from(rule: BuiltinRule) -> Self {
        Self {
            name: rule.name(),
            description: rule.description(),
            success_message: rule.success_message(),
            failure_message: rule.failure_message(),
        }
    }
}

pub fn run(json_output: bool, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json_output {
        let rules: Vec<RuleInfo> = BuiltinRule::ALL.into_iter().map(RuleInfo::from).collect();
        println!("{}", serde_json::to_string_pretty(&rules)?);
        return Ok(());
    }

    println!("{}", "Built-in rules:".cyan().bold());
    for rule in BuiltinRule::ALL {
        println!("  {:10} {}", rule.name().white().bold(), rule.description());
        if verbose {
            println!("  {:10} fails with: {}", "", rule.failure_message().dimmed());
        }
    }
    println!();
    println!(
        "Use with {}",
        "sheetcheck validate <FILE> --rule <COL>=<RULE>".cyan()
    );

    Ok(())
}
