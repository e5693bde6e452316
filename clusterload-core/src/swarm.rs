//! The scheduling loop driving many simulated users

use crate::errors::{SwarmError, UserError};
use crate::pacing::WaitTime;
use crate::shutdown::{Shutdown, ShutdownListener};
use crate::stats::{RecordingClient, RequestStats, StatsReport};
use crate::user::UserBehavior;
use clusterload_config::SwarmConfig;
use clusterload_http::HttpClient;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Runtime settings of a swarm
#[derive(Debug, Clone, PartialEq)]
pub struct SwarmSettings {
    pub users: usize,
    /// Users started per second
    pub spawn_rate: f64,
    /// Stop after this long, measured from the start of the run
    pub run_time: Option<Duration>,
    pub wait_time: WaitTime,
    /// Interval of the progress log line; `None` disables it
    pub stats_interval: Option<Duration>,
}

impl Default for SwarmSettings {
    fn default() -> Self {
        Self {
            users: 1,
            spawn_rate: 1.0,
            run_time: None,
            wait_time: WaitTime::None,
            stats_interval: Some(Duration::from_secs(10)),
        }
    }
}

impl From<&SwarmConfig> for SwarmSettings {
    fn from(config: &SwarmConfig) -> Self {
        Self {
            users: config.users as usize,
            spawn_rate: config.spawn_rate,
            run_time: config.run_time,
            wait_time: config.pacing.into(),
            ..Default::default()
        }
    }
}

impl SwarmSettings {
    pub fn validate(&self) -> Result<(), SwarmError> {
        if self.users == 0 {
            return Err(SwarmError::InvalidSettings(
                "at least one user is required".to_string(),
            ));
        }
        if !(self.spawn_rate.is_finite() && self.spawn_rate > 0.0) {
            return Err(SwarmError::InvalidSettings(format!(
                "spawn rate must be a positive number, got {}",
                self.spawn_rate
            )));
        }
        if self.run_time.is_some_and(|d| d.is_zero()) {
            return Err(SwarmError::InvalidSettings(
                "run time must be greater than zero".to_string(),
            ));
        }
        if self.stats_interval.is_some_and(|d| d.is_zero()) {
            return Err(SwarmError::InvalidSettings(
                "stats interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Time between two user spawns; saturates for vanishingly small rates
    fn spawn_interval(&self) -> Duration {
        Duration::try_from_secs_f64(1.0 / self.spawn_rate).unwrap_or(Duration::MAX)
    }
}

/// Spawns users, runs them until stopped and collects statistics.
///
/// A swarm is single-use: once its shutdown has been triggered, later runs
/// end immediately.
pub struct Swarm {
    settings: SwarmSettings,
    shutdown: Shutdown,
}

enum UserExit {
    Stopped(u64),
    Failed(UserError),
}

impl Swarm {
    pub fn new(settings: SwarmSettings) -> Result<Self, SwarmError> {
        settings.validate()?;
        Ok(Self {
            settings,
            shutdown: Shutdown::new(),
        })
    }

    pub fn settings(&self) -> &SwarmSettings {
        &self.settings
    }

    /// Handle that stops the run from outside, e.g. on ctrl-c
    pub fn shutdown_handle(&self) -> Shutdown {
        self.shutdown.clone()
    }

    /// Run the swarm to completion.
    ///
    /// `make_user` is called once per user with the user's index. Every
    /// request goes through `client`, wrapped so that it is recorded.
    pub async fn run<C, F, B>(&self, client: C, mut make_user: F) -> Result<StatsReport, SwarmError>
    where
        C: HttpClient + 'static,
        F: FnMut(usize) -> B,
        B: UserBehavior + 'static,
    {
        let stats = Arc::new(RequestStats::new());
        let client: Arc<dyn HttpClient> =
            Arc::new(RecordingClient::new(client, Arc::clone(&stats)));
        let mut listener = self.shutdown.listener();

        info!(
            users = self.settings.users,
            spawn_rate = self.settings.spawn_rate,
            run_time = ?self.settings.run_time,
            wait_time = ?self.settings.wait_time,
            "Starting swarm"
        );

        let mut background = JoinSet::new();
        if let Some(run_time) = self.settings.run_time {
            let shutdown = self.shutdown.clone();
            let mut listener = shutdown.listener();
            background.spawn(async move {
                tokio::select! {
                    _ = tokio::time::sleep(run_time) => shutdown.trigger("run time elapsed"),
                    _ = listener.wait() => {}
                }
            });
        }
        if let Some(interval) = self.settings.stats_interval {
            background.spawn(log_progress(Arc::clone(&stats), interval, self.shutdown.listener()));
        }

        let mut users = JoinSet::new();
        let spawn_interval = self.settings.spawn_interval();
        for index in 0..self.settings.users {
            if listener.is_triggered() {
                break;
            }

            let behavior = make_user(index);
            users.spawn(run_user(
                index,
                behavior,
                Arc::clone(&client),
                self.settings.wait_time,
                self.shutdown.listener(),
            ));

            if index + 1 < self.settings.users && !spawn_interval.is_zero() {
                tokio::select! {
                    _ = tokio::time::sleep(spawn_interval) => {}
                    _ = listener.wait() => break,
                }
            }
        }
        let spawned = users.len();
        info!("All {} users spawned", spawned);

        let mut failures = Vec::new();
        let mut iterations = 0;
        loop {
            tokio::select! {
                _ = listener.wait() => break,
                joined = users.join_next() => match joined {
                    Some(joined) => collect_exit(joined, &mut iterations, &mut failures),
                    None => break,
                },
            }
        }

        self.shutdown.trigger("swarm finished");
        while let Some(joined) = users.join_next().await {
            collect_exit(joined, &mut iterations, &mut failures);
        }
        background.shutdown().await;

        let report = stats.snapshot();
        info!(
            iterations,
            requests = report.total.requests,
            failures = report.total.failures,
            "Swarm stopped"
        );

        if spawned > 0 && failures.len() == spawned {
            let source = failures.swap_remove(0);
            return Err(SwarmError::AllUsersFailed {
                users: spawned,
                source,
            });
        }

        Ok(report)
    }
}

async fn run_user<B: UserBehavior>(
    index: usize,
    mut behavior: B,
    client: Arc<dyn HttpClient>,
    wait_time: WaitTime,
    mut shutdown: ShutdownListener,
) -> UserExit {
    debug!(user = index, behavior = behavior.name(), "User started");
    let mut iterations = 0u64;

    loop {
        tokio::select! {
            biased;
            _ = shutdown.wait() => break,
            result = behavior.run_iteration(client.as_ref()) => {
                if let Err(e) = result {
                    error!(user = index, "User stopped: {}", e);
                    return UserExit::Failed(e);
                }
                iterations += 1;
            }
        }

        match wait_time.next_wait() {
            // Give other tasks on this worker a turn; this is not a wait.
            None => tokio::task::yield_now().await,
            Some(wait) => tokio::select! {
                _ = shutdown.wait() => break,
                _ = tokio::time::sleep(wait) => {}
            },
        }
    }

    debug!(user = index, iterations, "User stopped");
    UserExit::Stopped(iterations)
}

fn collect_exit(
    joined: Result<UserExit, tokio::task::JoinError>,
    iterations: &mut u64,
    failures: &mut Vec<UserError>,
) {
    match joined {
        Ok(UserExit::Stopped(count)) => *iterations += count,
        Ok(UserExit::Failed(e)) => failures.push(e),
        Err(e) => warn!("User task ended abnormally: {}", e),
    }
}

async fn log_progress(stats: Arc<RequestStats>, interval: Duration, mut shutdown: ShutdownListener) {
    let mut ticker = tokio::time::interval(interval);
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = shutdown.wait() => break,
            _ = ticker.tick() => {
                let snapshot = stats.snapshot();
                info!(
                    requests = snapshot.total.requests,
                    failures = snapshot.total.failures,
                    rps = snapshot.total.requests_per_second,
                    p95_ms = snapshot.total.p95_ms,
                    "Progress"
                );
            }
        }
    }
}
