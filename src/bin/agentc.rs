//! agentc CLI Binary
//!
//! Compiles agent, skill, and stack fragments into generated agent documents.

use agentc::logging::init_logging;
use agentc::tooling::cli::{Cli, CliContext};
use agentc::tooling::format::format_error;
use clap::Parser;
use std::process;

fn main() {
    let cli = Cli::parse();

    let context = match CliContext::from_cli(&cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("{}", format_error(&e));
            process::exit(1);
        }
    };

    let logging = cli.logging_config(&context.config().logging);
    if let Err(e) = init_logging(Some(&logging)) {
        eprintln!("Warning: {}", e);
    }

    match context.execute(&cli.command()) {
        Ok(output) => {
            println!("{}", output.text);
            if !output.success {
                process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{}", format_error(&e));
            process::exit(1);
        }
    }
}
