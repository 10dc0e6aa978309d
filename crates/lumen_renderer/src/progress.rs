//! Render progress and remaining-time estimation.

use std::fmt;
use std::time::Duration;

/// Smoothing factor of the rows-per-second moving average.
pub const EMA_ALPHA: f64 = 0.15;
/// No estimate is shown before this many rows are finished.
pub const ETA_MIN_ROWS: usize = 25;
/// No estimate is shown before this much time has passed.
pub const ETA_MIN_ELAPSED: Duration = Duration::from_secs(2);

/// Exponentially smoothed throughput tracker for a row-based render.
#[derive(Debug, Clone)]
pub struct ProgressEstimator {
    total_rows: usize,
    rows_per_sec: Option<f64>,
}

impl ProgressEstimator {
    pub fn new(total_rows: usize) -> Self {
        Self {
            total_rows,
            rows_per_sec: None,
        }
    }

    /// Fold in a new observation and produce a snapshot for display.
    pub fn observe(&mut self, rows_done: usize, elapsed: Duration) -> ProgressSnapshot {
        let secs = elapsed.as_secs_f64();
        let instant_rate = if secs > 0.0 { rows_done as f64 / secs } else { 0.0 };

        let rate = match self.rows_per_sec {
            None => instant_rate,
            Some(previous) => EMA_ALPHA * instant_rate + (1.0 - EMA_ALPHA) * previous,
        };
        self.rows_per_sec = Some(rate);

        let eta = if rows_done >= ETA_MIN_ROWS && elapsed >= ETA_MIN_ELAPSED && rate > 0.0 {
            let remaining = self.total_rows.saturating_sub(rows_done) as f64;
            Some(Duration::from_secs_f64(remaining / rate))
        } else {
            None
        };

        ProgressSnapshot {
            rows_done,
            total_rows: self.total_rows,
            elapsed,
            eta,
        }
    }

    /// Current smoothed throughput, if any observation was made.
    pub fn rows_per_sec(&self) -> Option<f64> {
        self.rows_per_sec
    }
}

/// A single progress reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    pub rows_done: usize,
    pub total_rows: usize,
    pub elapsed: Duration,
    /// Projected time remaining, withheld while the estimate is still noisy
    pub eta: Option<Duration>,
}

impl ProgressSnapshot {
    pub fn percent(&self) -> f64 {
        if self.total_rows == 0 {
            100.0
        } else {
            100.0 * self.rows_done as f64 / self.total_rows as f64
        }
    }
}

impl fmt::Display for ProgressSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Render: {:.1}% ({}/{} rows) | Estimated Time Remaining: ",
            self.percent(),
            self.rows_done,
            self.total_rows
        )?;
        match self.eta {
            Some(eta) => write!(f, "{}", format_duration(eta))?,
            None => write!(f, "--")?,
        }
        write!(f, " | Elapsed: {}", format_duration(self.elapsed))
    }
}

/// Format as `Ns` below a minute and `Nm Ns` otherwise, rounded to the second.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs_f64().round() as u64;
    let (minutes, seconds) = (total / 60, total % 60);

    if minutes == 0 {
        format!("{}s", seconds)
    } else {
        format!("{}m {}s", minutes, seconds)
    }
}
