//! Domain-specific configuration modules

pub mod http;
pub mod logging;
pub mod swarm;
pub mod target;
pub mod utils;

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Complete clusterload configuration combining all domains
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ClusterloadConfig {
    /// Service under test
    #[serde(default)]
    pub target: target::TargetConfig,

    /// Load shape
    #[serde(default)]
    pub swarm: swarm::SwarmConfig,

    /// HTTP client configuration
    #[serde(default)]
    pub http: http::HttpConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: logging::LoggingConfig,
}

impl ClusterloadConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.target.validate()?;
        self.swarm.validate()?;
        self.http.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Render as YAML, in the same shape the loader reads
    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> ConfigResult<String> {
        let mut sample = Self::default();
        sample.swarm.users = 10;
        sample.swarm.spawn_rate = 5.0;
        sample.swarm.run_time = Some(std::time::Duration::from_secs(60));
        sample.to_yaml()
    }
}
