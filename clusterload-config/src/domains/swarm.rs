//! Swarm (load shape) configuration

use crate::error::{ConfigError, ConfigResult};
use crate::validation::{validate_positive, validate_seconds, Validatable};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// How many users to run, how fast to start them and for how long
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmConfig {
    /// Number of concurrent simulated users
    #[serde(default = "default_users")]
    pub users: u32,

    /// Users started per second until `users` are running
    #[serde(default = "default_spawn_rate")]
    pub spawn_rate: f64,

    /// Total run time; runs until interrupted when absent
    #[serde(
        with = "crate::domains::utils::serde_duration_option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub run_time: Option<Duration>,

    /// Wait inserted between two iterations of the same user
    #[serde(default)]
    pub pacing: PacingConfig,

    /// Seed for identifier selection. Each user derives its own stream from it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Wait between iterations, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PacingConfig {
    /// Start the next iteration immediately (maximum throughput)
    #[default]
    None,
    /// Fixed wait
    Constant { seconds: f64 },
    /// Uniformly random wait in `[min, max]`
    Between { min: f64, max: f64 },
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            users: default_users(),
            spawn_rate: default_spawn_rate(),
            run_time: None,
            pacing: PacingConfig::None,
            seed: None,
        }
    }
}

impl Validatable for SwarmConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_positive(self.users, "users", self.domain_name())?;
        validate_positive(self.spawn_rate, "spawn_rate", self.domain_name())?;
        if !self.spawn_rate.is_finite() {
            return Err(self.validation_error("spawn_rate must be finite"));
        }

        if let Some(run_time) = self.run_time {
            if run_time.is_zero() {
                return Err(self.validation_error("run_time must be greater than 0"));
            }
        }

        self.pacing.validate()
    }

    fn domain_name(&self) -> &'static str {
        "swarm"
    }
}

impl Validatable for PacingConfig {
    fn validate(&self) -> ConfigResult<()> {
        match *self {
            PacingConfig::None => Ok(()),
            PacingConfig::Constant { seconds } => {
                validate_seconds(seconds, "seconds", self.domain_name())
            }
            PacingConfig::Between { min, max } => {
                validate_seconds(min, "min", self.domain_name())?;
                validate_seconds(max, "max", self.domain_name())?;
                if min > max {
                    return Err(self.validation_error(format!(
                        "min ({}) must not exceed max ({})",
                        min, max
                    )));
                }
                Ok(())
            }
        }
    }

    fn domain_name(&self) -> &'static str {
        "swarm.pacing"
    }
}

/// Parses the command line form: `none`, `constant:SECS` or `between:MIN:MAX`.
impl FromStr for PacingConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_secs = |value: &str| {
            value.trim().parse::<f64>().map_err(|e| ConfigError::DomainError {
                domain: "swarm.pacing".to_string(),
                message: format!("invalid number of seconds {:?}: {}", value, e),
            })
        };

        let parts: Vec<&str> = s.split(':').collect();
        let pacing = match parts.as_slice() {
            [mode] if mode.eq_ignore_ascii_case("none") => PacingConfig::None,
            [mode, seconds] if mode.eq_ignore_ascii_case("constant") => PacingConfig::Constant {
                seconds: parse_secs(*seconds)?,
            },
            [mode, min, max] if mode.eq_ignore_ascii_case("between") => PacingConfig::Between {
                min: parse_secs(*min)?,
                max: parse_secs(*max)?,
            },
            _ => {
                return Err(ConfigError::DomainError {
                    domain: "swarm.pacing".to_string(),
                    message: format!(
                        "invalid pacing {:?}, expected none, constant:SECS or between:MIN:MAX",
                        s
                    ),
                })
            }
        };

        pacing.validate()?;
        Ok(pacing)
    }
}

impl fmt::Display for PacingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacingConfig::None => write!(f, "none"),
            PacingConfig::Constant { seconds } => write!(f, "constant:{}", seconds),
            PacingConfig::Between { min, max } => write!(f, "between:{}:{}", min, max),
        }
    }
}

fn default_users() -> u32 {
    1
}

fn default_spawn_rate() -> f64 {
    1.0
}
