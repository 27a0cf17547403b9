use clap::Parser;
use extsort::cli::{Cli, run_cli_with_config};
use extsort::output::OutputFormatter;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    extsort::logging::init(cli.verbose);

    match run_cli_with_config(
        cli.organize_command(),
        cli.directory.as_deref(),
        cli.config.as_deref(),
    ) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&format!("Error organizing files: {}", e));
            ExitCode::FAILURE
        }
    }
}
