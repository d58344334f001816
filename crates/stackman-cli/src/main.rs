//! InfluxDB Stack Manager
//!
//! Main entry point for the `influxdb-stack-manager` binary.

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use stackman_cli::cli::Cli;
use stackman_cli::error::CliError;
use stackman_log::{LogConfig, Timer};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(&cli) {
        eprintln!("{e}");
        return e.exit_code();
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            e.exit_code()
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = cli.load_config()?;

    let timer = Timer::start(cli.command.name());
    let result = cli.execute(config);
    timer.finish();
    result
}

fn init_tracing(cli: &Cli) -> Result<(), CliError> {
    let mut config = LogConfig::from_env();
    config.level = config.level.with_verbosity(cli.verbose, cli.quiet);
    stackman_log::init(config)?;
    Ok(())
}
