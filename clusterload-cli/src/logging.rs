//! Tracing subscriber setup
//!
//! Logs go to stderr so that the report printed on stdout stays clean.

use anyhow::{Context, Result};
use clusterload_config::{LogFormat, LoggingConfig};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

/// Build the filter: the CLI level wins, then `RUST_LOG`, then the config.
fn build_filter(config: &LoggingConfig, cli_level: Option<&str>) -> Result<EnvFilter> {
    let mut filter = match cli_level {
        Some(level) => EnvFilter::try_new(level)
            .with_context(|| format!("Invalid log level: {}", level))?,
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.level.as_str())),
    };

    if let Some(ref directives) = config.filter {
        for directive in directives.split(',').filter(|d| !d.trim().is_empty()) {
            let directive = directive
                .trim()
                .parse::<Directive>()
                .with_context(|| format!("Invalid log filter directive: {}", directive))?;
            filter = filter.add_directive(directive);
        }
    }

    Ok(filter)
}

pub fn init_logging(config: &LoggingConfig, cli_level: Option<&str>) -> Result<()> {
    let filter = build_filter(config, cli_level)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    // Use try_init to avoid panic if global subscriber already set
    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Text => builder.try_init(),
    };
    if result.is_err() {
        tracing::debug!("Global tracing subscriber already initialized, skipping");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_level_wins() {
        let config = LoggingConfig::default();
        let filter = build_filter(&config, Some("debug")).unwrap();
        assert_eq!(
            filter.max_level_hint(),
            Some(tracing_subscriber::filter::LevelFilter::DEBUG)
        );
    }

    #[test]
    fn test_invalid_cli_level() {
        let config = LoggingConfig::default();
        assert!(build_filter(&config, Some("clusterload=loudest")).is_err());
    }

    #[test]
    fn test_extra_directives() {
        let config = LoggingConfig {
            filter: Some("hyper=warn, reqwest=warn".to_string()),
            ..Default::default()
        };
        let filter = build_filter(&config, Some("info")).unwrap().to_string();
        assert!(filter.contains("hyper=warn"));
        assert!(filter.contains("reqwest=warn"));
    }
}
