//! `clusterload config ...`

use anyhow::{Context, Result};
use clusterload_config::{ClusterloadConfig, ConfigLoader};
use std::fs;
use std::path::Path;
use tracing::{error, info};

pub fn validate(config_file: &Path) -> Result<()> {
    info!("Validating configuration file: {:?}", config_file);

    if !config_file.exists() {
        return Err(anyhow::anyhow!(
            "Configuration file not found: {:?}",
            config_file
        ));
    }

    // The file alone is checked; environment overrides belong to a run.
    let checked = ConfigLoader::new()
        .parse_file(config_file)
        .and_then(|config| config.validate_all())
        .with_context(|| format!("Invalid configuration file {:?}", config_file));

    match checked {
        Ok(_) => {
            println!("Configuration file is valid");
            Ok(())
        }
        Err(e) => {
            error!("Configuration validation failed: {:#}", e);
            Err(e)
        }
    }
}

pub fn generate(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        return Err(anyhow::anyhow!(
            "Output file already exists: {:?}. Use --force to overwrite.",
            output
        ));
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("Failed to create output directory")?;
    }

    let sample = ClusterloadConfig::generate_sample().context("Failed to render sample")?;
    fs::write(output, sample)
        .with_context(|| format!("Failed to write configuration to {:?}", output))?;

    println!("Sample configuration written to {:?}", output);
    Ok(())
}

pub fn show(config: &ClusterloadConfig) -> Result<()> {
    config
        .validate_all()
        .context("Effective configuration is invalid")?;
    let yaml = config.to_yaml().context("Failed to render configuration")?;
    print!("{}", yaml);
    Ok(())
}
