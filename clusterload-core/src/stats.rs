//! Request statistics collected by the harness
//!
//! Requests are grouped by method and concrete path. Response times are kept
//! as rounded millisecond buckets so memory stays flat on long runs while
//! percentiles stay accurate to about two significant digits.

use chrono::{DateTime, Utc};
use clusterload_http::{HttpClient, HttpError, HttpMethod, HttpResponse};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

const PERCENTILES: [f64; 3] = [0.50, 0.95, 0.99];

/// Shared, thread-safe request statistics
#[derive(Debug)]
pub struct RequestStats {
    started_at: DateTime<Utc>,
    started: Instant,
    entries: Mutex<BTreeMap<(HttpMethod, String), EntryStats>>,
}

#[derive(Debug, Clone, Default)]
struct EntryStats {
    requests: u64,
    failures: u64,
    total_time: Duration,
    min_time: Option<Duration>,
    max_time: Duration,
    total_bytes: u64,
    response_times: BTreeMap<u64, u64>,
    status_codes: BTreeMap<u16, u64>,
    failure_reasons: BTreeMap<String, u64>,
}

/// Point-in-time summary of one entry, or of all entries combined
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EntryReport {
    pub method: String,
    pub name: String,
    pub requests: u64,
    pub failures: u64,
    pub requests_per_second: f64,
    pub avg_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub p50_ms: u64,
    pub p95_ms: u64,
    pub p99_ms: u64,
    pub avg_bytes: f64,
    pub status_codes: BTreeMap<u16, u64>,
    pub failure_reasons: BTreeMap<String, u64>,
}

/// Snapshot of a [`RequestStats`]
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub started_at: DateTime<Utc>,
    pub elapsed_secs: f64,
    pub entries: Vec<EntryReport>,
    pub total: EntryReport,
}

impl RequestStats {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            started: Instant::now(),
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    /// Record one finished request
    pub fn record(
        &self,
        method: HttpMethod,
        name: &str,
        latency: Duration,
        outcome: &Result<HttpResponse, HttpError>,
    ) {
        let mut entries = self.entries.lock();
        entries
            .entry((method, name.to_string()))
            .or_default()
            .record(latency, outcome);
    }

    pub fn snapshot(&self) -> StatsReport {
        let elapsed = self.started.elapsed();
        let entries = self.entries.lock();

        let mut total = EntryStats::default();
        let reports = entries
            .iter()
            .map(|((method, name), stats)| {
                total.merge(stats);
                stats.report(method.as_str(), name, elapsed)
            })
            .collect();

        StatsReport {
            started_at: self.started_at,
            elapsed_secs: elapsed.as_secs_f64(),
            entries: reports,
            total: total.report("", "Aggregated", elapsed),
        }
    }
}

impl Default for RequestStats {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryStats {
    fn record(&mut self, latency: Duration, outcome: &Result<HttpResponse, HttpError>) {
        self.requests += 1;
        self.total_time += latency;
        self.max_time = self.max_time.max(latency);
        self.min_time = Some(self.min_time.map_or(latency, |min| min.min(latency)));
        *self
            .response_times
            .entry(rounded_millis(latency))
            .or_default() += 1;

        match outcome {
            Ok(response) => {
                self.total_bytes += response.content_length as u64;
                *self.status_codes.entry(response.status).or_default() += 1;
                if response.is_failure() {
                    self.failures += 1;
                    *self
                        .failure_reasons
                        .entry(format!("HTTP {}", response.status))
                        .or_default() += 1;
                }
            }
            Err(error) => {
                self.failures += 1;
                *self
                    .failure_reasons
                    .entry(error.kind().to_string())
                    .or_default() += 1;
            }
        }
    }

    fn merge(&mut self, other: &EntryStats) {
        self.requests += other.requests;
        self.failures += other.failures;
        self.total_time += other.total_time;
        self.max_time = self.max_time.max(other.max_time);
        self.min_time = match (self.min_time, other.min_time) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.total_bytes += other.total_bytes;
        for (bucket, count) in &other.response_times {
            *self.response_times.entry(*bucket).or_default() += count;
        }
        for (status, count) in &other.status_codes {
            *self.status_codes.entry(*status).or_default() += count;
        }
        for (reason, count) in &other.failure_reasons {
            *self.failure_reasons.entry(reason.clone()).or_default() += count;
        }
    }

    /// Smallest bucket covering `fraction` of the requests
    fn percentile(&self, fraction: f64) -> u64 {
        if self.requests == 0 {
            return 0;
        }

        let wanted = ((self.requests as f64) * fraction).ceil().max(1.0) as u64;
        let mut seen = 0;
        for (bucket, count) in &self.response_times {
            seen += count;
            if seen >= wanted {
                return *bucket;
            }
        }
        self.response_times.keys().next_back().copied().unwrap_or(0)
    }

    fn report(&self, method: &str, name: &str, elapsed: Duration) -> EntryReport {
        let secs = elapsed.as_secs_f64();
        let per_request = |value: f64| {
            if self.requests == 0 {
                0.0
            } else {
                value / self.requests as f64
            }
        };

        EntryReport {
            method: method.to_string(),
            name: name.to_string(),
            requests: self.requests,
            failures: self.failures,
            requests_per_second: if secs > 0.0 {
                self.requests as f64 / secs
            } else {
                0.0
            },
            avg_ms: per_request(self.total_time.as_secs_f64() * 1000.0),
            min_ms: self.min_time.unwrap_or_default().as_secs_f64() * 1000.0,
            max_ms: self.max_time.as_secs_f64() * 1000.0,
            p50_ms: self.percentile(PERCENTILES[0]),
            p95_ms: self.percentile(PERCENTILES[1]),
            p99_ms: self.percentile(PERCENTILES[2]),
            avg_bytes: per_request(self.total_bytes as f64),
            status_codes: self.status_codes.clone(),
            failure_reasons: self.failure_reasons.clone(),
        }
    }
}

/// Round to two significant digits above 100ms
fn rounded_millis(latency: Duration) -> u64 {
    let ms = latency.as_secs_f64() * 1000.0;
    let step = match ms {
        ms if ms < 100.0 => 1.0,
        ms if ms < 1_000.0 => 10.0,
        ms if ms < 10_000.0 => 100.0,
        _ => 1_000.0,
    };
    ((ms / step).round() * step) as u64
}

impl EntryReport {
    pub fn failure_ratio(&self) -> f64 {
        if self.requests == 0 {
            0.0
        } else {
            self.failures as f64 / self.requests as f64
        }
    }
}

impl StatsReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for StatsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(118);

        writeln!(
            f,
            "{:<7} {:<52} {:>8} {:>14} | {:>8} {:>8} {:>8} {:>6} {:>6} | {:>8}",
            "Type", "Name", "# reqs", "# fails", "Avg", "Min", "Max", "p95", "p99", "req/s"
        )?;
        writeln!(f, "{}", rule)?;
        for entry in self.entries.iter().chain(std::iter::once(&self.total)) {
            if std::ptr::eq(entry, &self.total) {
                writeln!(f, "{}", rule)?;
            }
            writeln!(
                f,
                "{:<7} {:<52} {:>8} {:>14} | {:>8.1} {:>8.1} {:>8.1} {:>6} {:>6} | {:>8.2}",
                entry.method,
                entry.name,
                entry.requests,
                format!("{}({:.2}%)", entry.failures, entry.failure_ratio() * 100.0),
                entry.avg_ms,
                entry.min_ms,
                entry.max_ms,
                entry.p95_ms,
                entry.p99_ms,
                entry.requests_per_second,
            )?;
        }

        if !self.total.failure_reasons.is_empty() {
            writeln!(f)?;
            writeln!(f, "Failures:")?;
            for (reason, count) in &self.total.failure_reasons {
                writeln!(f, "{:>8}  {}", count, reason)?;
            }
        }

        write!(f, "Elapsed: {:.1}s", self.elapsed_secs)
    }
}

/// Wraps a client and records every request it makes
pub struct RecordingClient<C> {
    inner: C,
    stats: Arc<RequestStats>,
}

impl<C: HttpClient> RecordingClient<C> {
    pub fn new(inner: C, stats: Arc<RequestStats>) -> Self {
        Self { inner, stats }
    }

    pub fn stats(&self) -> &Arc<RequestStats> {
        &self.stats
    }
}

#[async_trait::async_trait]
impl<C: HttpClient> HttpClient for RecordingClient<C> {
    async fn get(&self, path: &str) -> Result<HttpResponse, HttpError> {
        let start = Instant::now();
        let result = self.inner.get(path).await;
        self.stats
            .record(HttpMethod::Get, path, start.elapsed(), &result);
        result
    }
}
