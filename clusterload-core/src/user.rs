//! The simulated user

use crate::errors::UserError;
use crate::index::{IndexSource, RandomIndex};
use clusterload_http::HttpClient;
use std::sync::Arc;
use tracing::trace;

/// Cluster identifiers targeted when no list is configured
pub const DEFAULT_CLUSTER_IDS: [&str; 12] = [
    "4a09785674d14344d92b1212b6e810369535ea1c",
    "dcfc37347dd5794515d7bb08ffcbca654f47d744",
    "dbf5013b65b95c339ecd6563acd4b8016cd0d80f",
    "486818732c691850ddcd5b241ca23319454fe575",
    "4bb7275205086e01c4bdef60113abd1c6c07b666",
    "d16bf0750fcda12088c406510f2d2f6c50d4097c",
    "f4468b46760db96b07658c71338db961fb6de72f",
    "6bfb0a0bfd71b41f71bd956b5e6af76c8ad5cd2b",
    "4a7fb852bb3f120e676f906c7e208e43f6dc1003",
    "ef4d97771d424720fb370d0e82f4537efb72c47a",
    "b8186e0e1806966514ea8d45b3eb3e7681bdf974",
    "c544b2178af4a4428cd1e12ca26d6428e3d24276",
];

const CLUSTERS_PREFIX: &str = "/clusters/";

/// Ordered, immutable set of cluster identifiers.
///
/// Duplicates are allowed and simply weight the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterIdentifiers {
    ids: Vec<String>,
}

impl ClusterIdentifiers {
    pub fn new(ids: Vec<String>) -> Self {
        Self { ids }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|candidate| candidate == id)
    }

    /// Choose one identifier using `source`
    pub fn choose(&self, source: &mut (impl IndexSource + ?Sized)) -> Result<&str, UserError> {
        if self.ids.is_empty() {
            return Err(UserError::EmptyIdentifierSet);
        }

        let len = self.ids.len();
        let index = source.next_index(len);
        self.ids
            .get(index)
            .map(String::as_str)
            .ok_or(UserError::IndexOutOfRange { index, len })
    }

    /// Path requested for `id`. The identifier is inserted verbatim.
    pub fn path_for(id: &str) -> String {
        format!("{}{}", CLUSTERS_PREFIX, id)
    }
}

impl Default for ClusterIdentifiers {
    fn default() -> Self {
        Self::new(DEFAULT_CLUSTER_IDS.iter().map(|id| id.to_string()).collect())
    }
}

impl From<Vec<String>> for ClusterIdentifiers {
    fn from(ids: Vec<String>) -> Self {
        Self::new(ids)
    }
}

impl From<&clusterload_config::TargetConfig> for ClusterIdentifiers {
    fn from(config: &clusterload_config::TargetConfig) -> Self {
        match config.identifiers {
            Some(ref ids) => Self::new(ids.clone()),
            None => Self::default(),
        }
    }
}

/// Behavior the swarm drives once per scheduling tick
#[async_trait::async_trait]
pub trait UserBehavior: Send {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Perform one task iteration.
    ///
    /// An `Err` means the user cannot continue; the swarm stops it.
    async fn run_iteration(&mut self, client: &dyn HttpClient) -> Result<(), UserError>;
}

/// A user that GETs `/clusters/{id}` for a uniformly chosen id on every iteration
pub struct SimulatedUser<I = RandomIndex> {
    identifiers: Arc<ClusterIdentifiers>,
    index: I,
}

impl SimulatedUser<RandomIndex> {
    /// User selecting with an entropy-seeded generator
    pub fn new(identifiers: Arc<ClusterIdentifiers>) -> Self {
        Self::with_index_source(identifiers, RandomIndex::from_entropy())
    }
}

impl<I: IndexSource> SimulatedUser<I> {
    pub fn with_index_source(identifiers: Arc<ClusterIdentifiers>, index: I) -> Self {
        Self { identifiers, index }
    }

    pub fn identifiers(&self) -> &ClusterIdentifiers {
        &self.identifiers
    }

    /// Select the next identifier and build its request path
    pub fn next_path(&mut self) -> Result<String, UserError> {
        let id = self.identifiers.choose(&mut self.index)?;
        Ok(ClusterIdentifiers::path_for(id))
    }
}

#[async_trait::async_trait]
impl<I: IndexSource> UserBehavior for SimulatedUser<I> {
    fn name(&self) -> &str {
        "clusters"
    }

    async fn run_iteration(&mut self, client: &dyn HttpClient) -> Result<(), UserError> {
        let path = self.next_path()?;
        // The outcome belongs to whoever wraps the client.
        let outcome = client.get(&path).await;
        trace!(path = %path, ok = outcome.is_ok(), "iteration done");
        Ok(())
    }
}
