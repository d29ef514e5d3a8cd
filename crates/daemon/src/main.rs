// SPDX-License-Identifier: MIT

use clap::Parser;
use hydrogen_core::Config;
use hydrogen_daemon::cli::Cli;
use hydrogen_daemon::run;

fn load_config(cli: &Cli) -> Result<Config, hydrogen_daemon::DaemonError> {
    let mut config = if cli.config.exists() {
        let raw = std::fs::read_to_string(&cli.config).map_err(|source| {
            hydrogen_daemon::DaemonError::ConfigRead {
                path: cli.config.display().to_string(),
                source,
            }
        })?;
        Config::load_from_str(&raw)?
    } else {
        Config::default()
    };

    if let Some(state_dir) = &cli.state_dir {
        config.state_dir = state_dir.clone();
    }
    if let Some(log_level) = &cli.log_level {
        config.log_filter = Some(log_level.clone());
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Config parsing/validation happens entirely before any subsystem's
    // check_ready runs (spec §6.3); no subscriber is installed yet, so
    // failures here go to stderr directly rather than through tracing.
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("hydrogend: configuration error: {err}");
            return std::process::ExitCode::FAILURE;
        }
    };

    match run::run(config).await {
        Ok(outcome) if outcome.any_launched => std::process::ExitCode::SUCCESS,
        Ok(_) => std::process::ExitCode::FAILURE,
        Err(err) => {
            eprintln!("hydrogend: {err}");
            std::process::ExitCode::FAILURE
        }
    }
}
