//! Target service configuration

use crate::error::ConfigResult;
use crate::validation::{validate_required_string, validate_url, Validatable};
use serde::{Deserialize, Serialize};

/// What the simulated users hit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Base URL of the service under test, e.g. `http://localhost:8080`
    #[serde(default = "default_host")]
    pub host: String,

    /// Cluster identifiers to pick from. When absent the built-in set is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifiers: Option<Vec<String>>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            identifiers: None,
        }
    }
}

impl Validatable for TargetConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_url(&self.host, "host", self.domain_name())?;

        if let Some(ref identifiers) = self.identifiers {
            if identifiers.is_empty() {
                return Err(self.validation_error("identifiers cannot be an empty list"));
            }
            for id in identifiers {
                validate_required_string(id, "identifier", self.domain_name())?;
                if id.contains('/') {
                    return Err(
                        self.validation_error(format!("identifier {:?} must not contain '/'", id))
                    );
                }
            }
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "target"
    }
}

fn default_host() -> String {
    "http://localhost:8080".to_string()
}
