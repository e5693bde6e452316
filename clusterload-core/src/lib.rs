//! Core of clusterload: the simulated user and the harness that drives it.
//!
//! A [`SimulatedUser`] knows nothing about scheduling. It is handed an
//! [`HttpClient`](clusterload_http::HttpClient) and an [`IndexSource`], and each
//! call to [`UserBehavior::run_iteration`] performs exactly one GET. The
//! [`Swarm`] owns everything else: spawning users at a given rate, pacing,
//! shutdown and request statistics.

pub mod errors;
pub mod index;
pub mod pacing;
pub mod shutdown;
pub mod stats;
pub mod swarm;
pub mod user;

pub use errors::{SwarmError, UserError};
pub use index::{IndexSource, RandomIndex};
pub use pacing::WaitTime;
pub use shutdown::{Shutdown, ShutdownListener};
pub use stats::{EntryReport, RecordingClient, RequestStats, StatsReport};
pub use swarm::{Swarm, SwarmSettings};
pub use user::{ClusterIdentifiers, SimulatedUser, UserBehavior, DEFAULT_CLUSTER_IDS};
