//! Wait time between two iterations of a user

use clusterload_config::PacingConfig;
use rand::Rng;
use std::time::Duration;

/// Pacing applied by the swarm after each iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitTime {
    /// Start the next iteration right away
    #[default]
    None,
    Constant(Duration),
    /// Uniformly random wait in `[min, max]`
    Between { min: Duration, max: Duration },
}

impl WaitTime {
    /// The wait before the next iteration, `None` when there is none
    pub fn next_wait(&self) -> Option<Duration> {
        match *self {
            WaitTime::None => None,
            WaitTime::Constant(wait) => Some(wait),
            WaitTime::Between { min, max } if min >= max => Some(min),
            WaitTime::Between { min, max } => {
                let secs = rand::rng().random_range(min.as_secs_f64()..=max.as_secs_f64());
                Some(Duration::from_secs_f64(secs))
            }
        }
    }
}

/// Expects a validated `PacingConfig`; negative or non-finite values clamp to zero.
impl From<PacingConfig> for WaitTime {
    fn from(config: PacingConfig) -> Self {
        let secs = |value: f64| Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO);
        match config {
            PacingConfig::None => WaitTime::None,
            PacingConfig::Constant { seconds } => WaitTime::Constant(secs(seconds)),
            PacingConfig::Between { min, max } => WaitTime::Between {
                min: secs(min),
                max: secs(max),
            },
        }
    }
}
