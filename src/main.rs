// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use precice_case_generate::emitter::ValidatorOutcome;
use precice_case_generate::{generate_case, logging};

/// Generate a runnable preCICE case from a topology description.
#[derive(Parser, Debug)]
#[command(name = "precice-case-generate", version)]
struct Cli {
    /// Path to the input YAML file.
    file_path: PathBuf,

    /// A custom output path for the generated files.
    #[arg(short, long, default_value = ".")]
    output_path: PathBuf,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    tracing::info!("Program started.");

    let report = match generate_case(&cli.file_path, &cli.output_path) {
        Ok(report) => report,
        Err(error) => {
            tracing::error!("{error}");
            return ExitCode::from(error.exit_code() as u8);
        }
    };

    match &report.validator {
        ValidatorOutcome::Passed | ValidatorOutcome::Skipped(_) => {
            tracing::info!("Program finished.");
            ExitCode::SUCCESS
        }
        ValidatorOutcome::SyntacticErrors(details) => {
            report_validator_failure("syntactic", details);
            ExitCode::from(2)
        }
        ValidatorOutcome::LogicalErrors(details) => {
            report_validator_failure("logical", details);
            ExitCode::from(2)
        }
    }
}

fn report_validator_failure(kind: &str, details: &str) {
    let quoted: String = details
        .lines()
        .map(|line| format!("> {line}\n"))
        .collect();
    tracing::error!(
        "The generated preCICE configuration file failed to validate with precice-config-check due to {kind} errors:\n{quoted}The generated files are kept on disk for inspection."
    );
}
