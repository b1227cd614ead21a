//! Synthetic CMS-1500 form generator.

use std::process::ExitCode;

use clap::Parser;

use claim_cli::cli::Cli;
use claim_cli::commands::run_batch;
use claim_cli::logging::init_logging;
use claim_cli::summary::print_summary;

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.color.write_global();
    if let Err(error) = init_logging(&cli.log_config()) {
        eprintln!("error: failed to initialize logging: {error}");
        return ExitCode::FAILURE;
    }
    match run_batch(&cli.batch_config()) {
        Ok(result) => {
            print_summary(&result);
            if result.has_failures() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}
