//! Subcommand handlers

pub mod config;
pub mod run;

use anyhow::{Context, Result};
use clusterload_config::{ClusterloadConfig, ConfigLoader};
use std::path::Path;
use tracing::debug;

/// Load configuration from file when given, otherwise from environment and defaults.
///
/// Nothing is validated yet: command line overrides still have to be applied,
/// so callers validate the result themselves.
pub fn load_config(config_path: Option<&Path>) -> Result<ClusterloadConfig> {
    let loader = ConfigLoader::new();

    match config_path {
        Some(path) => loader
            .load_unvalidated(Some(path))
            .with_context(|| format!("Failed to load configuration from {:?}", path)),
        None => {
            debug!("No configuration file specified. Loading from environment or defaults.");
            loader
                .load_unvalidated(None::<&Path>)
                .context("Failed to load configuration from environment")
        }
    }
}
