//! sheetcheck CLI - validate CSV and Excel uploads.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Validate {
            file,
            rules,
            names,
            no_skip_header,
            max_size,
            delimiter,
            detect_delimiter,
            json,
            limit,
        } => commands::validate::run(
            file,
            rules,
            names,
            no_skip_header,
            max_size,
            delimiter,
            detect_delimiter,
            json,
            limit,
            cli.verbose,
        ),

        Commands::Check { file, max_size } => commands::check::run(file, max_size, cli.verbose),

        Commands::Rules { json } => commands::rules::run(json, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` overrides the level picked by `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "sheetcheck=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
