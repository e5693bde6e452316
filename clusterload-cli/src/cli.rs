//! CLI argument parsing definitions

use clap::{Args, Parser, Subcommand};
use clusterload_config::PacingConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run simulated users against the target until the run time elapses or ctrl-c
    Run(RunArgs),

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        config_cmd: ConfigCommands,
    },
}

/// Overrides for a single run; anything unset comes from the config file or environment
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Base URL of the service under test
    #[arg(long, value_name = "URL")]
    pub host: Option<String>,

    /// Number of concurrent users
    #[arg(short, long, value_name = "N")]
    pub users: Option<u32>,

    /// Users started per second
    #[arg(short = 'r', long, value_name = "RATE")]
    pub spawn_rate: Option<f64>,

    /// Stop after this many seconds
    #[arg(short = 't', long, value_name = "SECS")]
    pub run_time: Option<u64>,

    /// Wait between iterations: none, constant:SECS or between:MIN:MAX
    #[arg(long, value_name = "PACING")]
    pub wait: Option<PacingConfig>,

    /// Seed identifier selection for a reproducible request sequence
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Seconds between progress log lines, 0 to disable
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    pub stats_interval: u64,

    /// Print the final report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Validate a configuration file
    Validate {
        /// Configuration file to validate
        #[arg(long, value_name = "PATH")]
        config_file: PathBuf,
    },

    /// Write a sample configuration file
    Generate {
        /// Output file path
        #[arg(long, value_name = "PATH")]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration (file, then environment)
    Show,
}
