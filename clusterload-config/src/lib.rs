//! Domain-driven configuration for clusterload
//!
//! Configuration is split by functional domain (target, swarm, http, logging),
//! each with its own defaults and validation. Files are YAML; any value can be
//! overridden through `CLUSTERLOAD_*` environment variables.

pub mod error;
pub mod loader;
pub mod validation;

pub mod domains;

pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use validation::Validatable;

pub use domains::{
    http::HttpConfig,
    logging::{LogFormat, LogLevel, LoggingConfig},
    swarm::{PacingConfig, SwarmConfig},
    target::TargetConfig,
    ClusterloadConfig,
};

pub use domains::utils::serde_duration;
