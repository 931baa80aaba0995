//! Latency, throughput and error accounting for engine operations

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Default number of latency samples retained per operation class.
pub const DEFAULT_SAMPLE_CAPACITY: usize = 8192;

/// Sliding window over which throughput is measured.
const THROUGHPUT_WINDOW: Duration = Duration::from_secs(60);

/// Operation classes sampled independently, each with its own bounded
/// window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Event application through `ingest`
    Ingest,
    /// Book snapshot reads
    Snapshot,
    /// Verification sweeps
    Verify,
}

impl Operation {
    /// Every operation class, for iteration.
    pub const ALL: [Operation; 3] = [Operation::Ingest, Operation::Snapshot, Operation::Verify];

    fn index(self) -> usize {
        match self {
            Operation::Ingest => 0,
            Operation::Snapshot => 1,
            Operation::Verify => 2,
        }
    }
}

/// Bounded ring of latency samples. Oldest samples are evicted at capacity;
/// unbounded growth would be a resource-exhaustion hazard in a long-running
/// server.
#[derive(Debug)]
struct SampleWindow {
    samples: VecDeque<Duration>,
    capacity: usize,
}

impl SampleWindow {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    fn push(&mut self, latency: Duration) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(latency);
    }
}

/// Per-second counts of applied events, pruned to the throughput window.
///
/// Kept separate from the latency rings: those are bounded by sample count,
/// which would cap the measurable rate, while this is bounded by time.
#[derive(Debug, Default)]
struct ThroughputWindow {
    /// (whole seconds since collector start, applied count in that second)
    buckets: VecDeque<(u64, u64)>,
}

impl ThroughputWindow {
    fn record(&mut self, second: u64) {
        match self.buckets.back_mut() {
            Some((bucket, count)) if *bucket == second => *count += 1,
            _ => {
                self.buckets.push_back((second, 1));
                self.prune(second);
            }
        }
    }

    fn prune(&mut self, now: u64) {
        let horizon = now.saturating_sub(THROUGHPUT_WINDOW.as_secs());
        while let Some((bucket, _)) = self.buckets.front() {
            if *bucket < horizon {
                self.buckets.pop_front();
            } else {
                break;
            }
        }
    }

    fn total(&mut self, now: u64) -> u64 {
        self.prune(now);
        self.buckets.iter().map(|(_, count)| count).sum()
    }
}

/// Aggregated metrics snapshot handed to the transport layer. Percentiles
/// and throughput describe the apply path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    /// Median apply latency in milliseconds, `None` before the first sample
    pub p50_ms: Option<f64>,
    /// 99th percentile apply latency in milliseconds
    pub p99_ms: Option<f64>,
    /// Applied events per second over the sliding window
    pub throughput: f64,
    /// Failed applies over total applies, 0 when nothing was ingested
    pub error_rate: f64,
    /// Seconds since the collector was created
    pub uptime_sec: f64,
    /// Total successfully applied events
    pub applied_total: u64,
    /// Total rejected events
    pub failed_total: u64,
    /// Apply-path latency samples currently retained
    pub sample_count: usize,
}

/// Records per-operation latency samples and apply/failure counts.
///
/// Counters are atomics; each operation class has its own sample ring
/// behind a mutex held only for a push or a copy-out, so recording never
/// contends with book locks.
#[derive(Debug)]
pub struct MetricsCollector {
    started_at: Instant,
    applied: AtomicU64,
    failed: AtomicU64,
    windows: [Mutex<SampleWindow>; 3],
    throughput: Mutex<ThroughputWindow>,
}

impl MetricsCollector {
    /// Create a collector with the default per-class sample capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_SAMPLE_CAPACITY)
    }

    /// Create a collector retaining at most `capacity` latency samples per
    /// operation class.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            started_at: Instant::now(),
            applied: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            windows: [
                Mutex::new(SampleWindow::with_capacity(capacity)),
                Mutex::new(SampleWindow::with_capacity(capacity)),
                Mutex::new(SampleWindow::with_capacity(capacity)),
            ],
            throughput: Mutex::new(ThroughputWindow::default()),
        }
    }

    /// Store a latency sample for one operation class.
    pub fn record(&self, operation: Operation, latency: Duration) {
        self.windows[operation.index()].lock().push(latency);
    }

    /// Record one successfully applied event and its latency.
    pub fn record_apply(&self, latency: Duration) {
        self.applied.fetch_add(1, Ordering::Relaxed);
        self.throughput.lock().record(self.uptime().as_secs());
        self.record(Operation::Ingest, latency);
    }

    /// Record one rejected event.
    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Total successfully applied events
    pub fn applied(&self) -> u64 {
        self.applied.load(Ordering::Relaxed)
    }

    /// Total rejected events
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Seconds the collector has been alive
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Apply-path percentile latency in milliseconds; see
    /// [`MetricsCollector::percentile_for`] for the interpolation rule.
    pub fn percentile(&self, p: f64) -> Option<f64> {
        self.percentile_for(Operation::Ingest, p)
    }

    /// The p-th percentile latency in milliseconds over one operation
    /// class's retained samples, `None` when no samples exist.
    ///
    /// Uses linear interpolation: for `n` sorted samples the rank is
    /// `(n - 1) * p / 100`, and the result interpolates between the samples
    /// at `floor(rank)` and `ceil(rank)`. For samples `[1, 2, ..., 100]` ms
    /// this puts p99 at 99.01 ms.
    pub fn percentile_for(&self, operation: Operation, p: f64) -> Option<f64> {
        let mut latencies: Vec<f64> = self.windows[operation.index()]
            .lock()
            .samples
            .iter()
            .map(|latency| latency.as_secs_f64() * 1000.0)
            .collect();
        if latencies.is_empty() {
            return None;
        }
        latencies.sort_by(|a, b| a.total_cmp(b));

        let n = latencies.len();
        let rank = (n - 1) as f64 * (p / 100.0).clamp(0.0, 1.0);
        let lo = rank.floor() as usize;
        if lo >= n - 1 {
            return Some(latencies[n - 1]);
        }
        let frac = rank - lo as f64;
        Some(latencies[lo] + frac * (latencies[lo + 1] - latencies[lo]))
    }

    /// Events applied within the sliding throughput window. Counted from
    /// per-second buckets, so the value is not limited by the latency
    /// ring's sample capacity.
    pub fn applied_in_window(&self) -> u64 {
        self.throughput.lock().total(self.uptime().as_secs())
    }

    /// Applied events per second over the sliding window, clamped to uptime
    /// so a freshly started collector reports finite rates.
    pub fn throughput(&self) -> f64 {
        let span = self.uptime().min(THROUGHPUT_WINDOW).as_secs_f64();
        if span <= 0.0 {
            return 0.0;
        }
        self.applied_in_window() as f64 / span
    }

    /// Failed applies over total applies. Zero when nothing was ingested.
    pub fn error_rate(&self) -> f64 {
        let applied = self.applied();
        let failed = self.failed();
        let total = applied + failed;
        if total == 0 {
            return 0.0;
        }
        failed as f64 / total as f64
    }

    /// Apply-path latency samples currently retained
    pub fn sample_count(&self) -> usize {
        self.sample_count_for(Operation::Ingest)
    }

    /// Latency samples currently retained for one operation class
    pub fn sample_count_for(&self, operation: Operation) -> usize {
        self.windows[operation.index()].lock().samples.len()
    }

    /// Aggregate everything into a serializable report.
    pub fn report(&self) -> MetricsReport {
        MetricsReport {
            p50_ms: self.percentile(50.0),
            p99_ms: self.percentile(99.0),
            throughput: self.throughput(),
            error_rate: self.error_rate(),
            uptime_sec: self.uptime().as_secs_f64(),
            applied_total: self.applied(),
            failed_total: self.failed(),
            sample_count: self.sample_count(),
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
