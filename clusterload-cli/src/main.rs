use anyhow::{Context, Result};
use clap::Parser;
use clusterload_config::LoggingConfig;
use std::process::ExitCode;
use tracing::{error, info};

mod cli;
mod commands;
mod logging;

use cli::{Cli, Commands, ConfigCommands};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let log_level = cli.log_level.as_deref();

    match cli.command {
        Commands::Run(args) => {
            let config = commands::load_config(cli.config.as_deref())?;
            let config = commands::run::apply_overrides(config, &args)
                .context("Invalid configuration")?;
            logging::init_logging(&config.logging, log_level)?;
            info!("clusterload starting");

            let report = commands::run::run(&config, &args).await?;
            if args.json {
                println!("{}", report.to_json()?);
            } else {
                println!("{}", report);
            }

            // Any failed request fails the run.
            if report.total.failures > 0 {
                error!(
                    "{} of {} requests failed",
                    report.total.failures, report.total.requests
                );
                return Ok(ExitCode::FAILURE);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config { config_cmd } => {
            match config_cmd {
                ConfigCommands::Validate { config_file } => {
                    logging::init_logging(&LoggingConfig::default(), log_level)?;
                    commands::config::validate(&config_file)?
                }
                ConfigCommands::Generate { output, force } => {
                    logging::init_logging(&LoggingConfig::default(), log_level)?;
                    commands::config::generate(&output, force)?
                }
                ConfigCommands::Show => {
                    let config = commands::load_config(cli.config.as_deref())?;
                    logging::init_logging(&config.logging, log_level)?;
                    commands::config::show(&config)?
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
