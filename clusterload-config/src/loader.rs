//! Configuration loading and environment variable handling

use crate::domains::ClusterloadConfig;
use crate::error::{ConfigError, ConfigResult};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new config loader with default prefix
    pub fn new() -> Self {
        Self {
            prefix: "CLUSTERLOAD".to_string(),
        }
    }

    /// Create a new config loader with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from a YAML file with environment overrides
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<ClusterloadConfig> {
        let mut config = self.parse_file(path)?;
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(&self) -> ConfigResult<ClusterloadConfig> {
        let mut config = ClusterloadConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load from `config_path` when given, otherwise from the environment
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<ClusterloadConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    /// Like [`ConfigLoader::load`] but without validation.
    ///
    /// Callers that layer further overrides on top must call
    /// [`ClusterloadConfig::validate_all`] once they are applied.
    pub fn load_unvalidated(
        &self,
        config_path: Option<impl AsRef<Path>>,
    ) -> ConfigResult<ClusterloadConfig> {
        let mut config = match config_path {
            Some(path) => self.parse_file(path)?,
            None => ClusterloadConfig::default(),
        };
        self.apply_env_overrides(&mut config)?;
        Ok(config)
    }

    /// Parse a YAML file as is, without environment overrides or validation
    pub fn parse_file(&self, path: impl AsRef<Path>) -> ConfigResult<ClusterloadConfig> {
        let path = path.as_ref();
        debug!("Loading configuration from {}", path.display());

        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    fn apply_env_overrides(&self, config: &mut ClusterloadConfig) -> ConfigResult<()> {
        if let Some(host) = self.get_env_var("HOST") {
            config.target.host = host;
        }

        if let Some(users) = self.parse_env_var::<u32>("USERS")? {
            config.swarm.users = users;
        }
        if let Some(rate) = self.parse_env_var::<f64>("SPAWN_RATE")? {
            config.swarm.spawn_rate = rate;
        }
        if let Some(seconds) = self.parse_env_var::<u64>("RUN_TIME")? {
            config.swarm.run_time = Some(Duration::from_secs(seconds));
        }
        if let Some(pacing) = self.get_env_var("WAIT") {
            config.swarm.pacing = pacing.parse()?;
        }
        if let Some(seed) = self.parse_env_var::<u64>("SEED")? {
            config.swarm.seed = Some(seed);
        }

        if let Some(seconds) = self.parse_env_var::<u64>("HTTP_TIMEOUT")? {
            config.http.timeout = Duration::from_secs(seconds);
        }
        if let Some(user_agent) = self.get_env_var("HTTP_USER_AGENT") {
            config.http.user_agent = user_agent;
        }
        if let Some(verify_ssl) = self.parse_env_var::<bool>("HTTP_VERIFY_SSL")? {
            config.http.verify_ssl = verify_ssl;
        }

        if let Some(level) = self.get_env_var("LOG_LEVEL") {
            config.logging.level = level.parse().map_err(ConfigError::EnvError)?;
        }
        if let Some(format) = self.get_env_var("LOG_FORMAT") {
            config.logging.format = format.parse().map_err(ConfigError::EnvError)?;
        }

        Ok(())
    }

    fn get_env_var(&self, key: &str) -> Option<String> {
        std::env::var(format!("{}_{}", self.prefix, key)).ok()
    }

    fn parse_env_var<T>(&self, key: &str) -> ConfigResult<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_env_var(key) {
            Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| {
                ConfigError::EnvError(format!("Invalid {}_{}: {}", self.prefix, key, e))
            }),
            None => Ok(None),
        }
    }
}
