use clap::{CommandFactory, Parser};
use std::process::ExitCode;

use logtally::cli::Cli;
use logtally::config::{format_error_message, TallyConfig};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
        return ExitCode::SUCCESS;
    }

    let config = TallyConfig::from_cli(&cli);
    let outcome = logtally::run(&config);

    if outcome.success {
        eprintln!("{}", outcome.message);
        ExitCode::SUCCESS
    } else {
        eprintln!(
            "{}",
            format_error_message(&outcome.message, &config.diagnostics.color)
        );
        ExitCode::FAILURE
    }
}
