//! `clusterload run`

use crate::cli::RunArgs;
use anyhow::{Context, Result};
use clusterload_config::{ClusterloadConfig, ConfigError};
use clusterload_core::{
    ClusterIdentifiers, RandomIndex, SimulatedUser, StatsReport, Swarm, SwarmSettings,
};
use clusterload_http::HttpManager;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Fold command line overrides into the loaded configuration and re-validate
pub fn apply_overrides(
    mut config: ClusterloadConfig,
    args: &RunArgs,
) -> Result<ClusterloadConfig, ConfigError> {
    if let Some(ref host) = args.host {
        config.target.host = host.clone();
    }
    if let Some(users) = args.users {
        config.swarm.users = users;
    }
    if let Some(spawn_rate) = args.spawn_rate {
        config.swarm.spawn_rate = spawn_rate;
    }
    if let Some(run_time) = args.run_time {
        config.swarm.run_time = Some(Duration::from_secs(run_time));
    }
    if let Some(wait) = args.wait {
        config.swarm.pacing = wait;
    }
    if let Some(seed) = args.seed {
        config.swarm.seed = Some(seed);
    }

    config.validate_all()?;
    Ok(config)
}

/// Index source for user `index`: derived from the seed when one is set
fn index_source(seed: Option<u64>, index: usize) -> RandomIndex {
    match seed {
        Some(seed) => RandomIndex::seeded(seed.wrapping_add(index as u64)),
        None => RandomIndex::from_entropy(),
    }
}

pub async fn run(config: &ClusterloadConfig, args: &RunArgs) -> Result<StatsReport> {
    let identifiers = Arc::new(ClusterIdentifiers::from(&config.target));
    info!(
        "Targeting {} with {} cluster identifiers",
        config.target.host,
        identifiers.len()
    );

    let client = HttpManager::with_config(&config.target.host, config.http.clone().into())
        .context("Failed to create HTTP client")?;

    let settings = SwarmSettings {
        stats_interval: (args.stats_interval > 0)
            .then(|| Duration::from_secs(args.stats_interval)),
        ..SwarmSettings::from(&config.swarm)
    };
    let swarm = Swarm::new(settings).context("Invalid swarm settings")?;

    let shutdown = swarm.shutdown_handle();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => shutdown.trigger("interrupted"),
            Err(e) => warn!("Unable to listen for ctrl-c: {}", e),
        }
    });

    let seed = config.swarm.seed;
    let report = swarm
        .run(client, |index| {
            SimulatedUser::with_index_source(Arc::clone(&identifiers), index_source(seed, index))
        })
        .await?;

    Ok(report)
}
