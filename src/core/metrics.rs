//! Logger metrics for observability
//!
//! Counters describing what happened to the records a logger was asked to
//! emit: written, suppressed by level, lost to write failures, or passed
//! through a failing hook.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use rust_log_facade::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_written();
/// metrics.record_suppressed();
///
/// assert_eq!(metrics.records_written(), 1);
/// assert_eq!(metrics.records_suppressed(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records handed to the output successfully
    records_written: AtomicU64,

    /// Records dropped because their level was disabled
    records_suppressed: AtomicU64,

    /// Records lost because the engine failed to write them
    write_failures: AtomicU64,

    /// Hook invocations that returned an error or panicked
    hook_failures: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            records_written: AtomicU64::new(0),
            records_suppressed: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
            hook_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn records_written(&self) -> u64 {
        self.records_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn records_suppressed(&self) -> u64 {
        self.records_suppressed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn hook_failures(&self) -> u64 {
        self.hook_failures.load(Ordering::Relaxed)
    }

    /// Record a written entry, returning the previous count
    #[inline]
    pub fn record_written(&self) -> u64 {
        self.records_written.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_suppressed(&self) -> u64 {
        self.records_suppressed.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_hook_failure(&self) -> u64 {
        self.hook_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of attempted writes that failed, as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been written yet.
    pub fn failure_rate(&self) -> f64 {
        let failed = self.write_failures() as f64;
        let total = self.records_written() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.records_written.store(0, Ordering::Relaxed);
        self.records_suppressed.store(0, Ordering::Relaxed);
        self.write_failures.store(0, Ordering::Relaxed);
        self.hook_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            records_written: AtomicU64::new(self.records_written()),
            records_suppressed: AtomicU64::new(self.records_suppressed()),
            write_failures: AtomicU64::new(self.write_failures()),
            hook_failures: AtomicU64::new(self.hook_failures()),
        }
    }
}
