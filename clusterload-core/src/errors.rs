//! Error types for users and the swarm

use thiserror::Error;

/// Errors a simulated user can raise on its own.
///
/// Request failures are not among them: those are recorded by the harness.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserError {
    #[error("cannot choose a cluster identifier from an empty set")]
    EmptyIdentifierSet,

    #[error("index source returned {index} for a set of {len} identifiers")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Errors from running a swarm
#[derive(Debug, Error)]
pub enum SwarmError {
    #[error("Invalid swarm settings: {0}")]
    InvalidSettings(String),

    #[error("All {users} users stopped with errors, first: {source}")]
    AllUsersFailed {
        users: usize,
        #[source]
        source: UserError,
    },
}
