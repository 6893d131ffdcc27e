//! Byte accounting and throughput reporting for a single download attempt.

use std::time::{Duration, Instant};

use super::constants::{BYTES_PER_MB, PROGRESS_REPORT_INTERVAL};

/// Snapshot of a download's progress, emitted at a fixed callback cadence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressReport {
    /// Cumulative bytes received so far.
    pub bytes_downloaded: u64,
    /// Total expected size, when the server reported one.
    pub total_bytes: Option<u64>,
    /// Wall-clock time since the tracker was created.
    pub elapsed: Duration,
}

impl ProgressReport {
    /// Percent complete (`100 * downloaded / total`), if the total is known and non-zero.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent(&self) -> Option<f64> {
        self.total_bytes
            .filter(|total| *total > 0)
            .map(|total| 100.0 * self.bytes_downloaded as f64 / total as f64)
    }

    /// Downloaded megabytes.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn downloaded_mb(&self) -> f64 {
        self.bytes_downloaded as f64 / BYTES_PER_MB
    }

    /// Total megabytes, if known.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn total_mb(&self) -> Option<f64> {
        self.total_bytes.map(|total| total as f64 / BYTES_PER_MB)
    }

    /// Average rate since the tracker was created, in MB/s.
    ///
    /// Zero when no measurable time has elapsed.
    #[must_use]
    pub fn rate_mbps(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.downloaded_mb() / secs
        } else {
            0.0
        }
    }
}

/// Accumulates bytes for one download attempt.
///
/// Create one per attempt and feed it every chunk via [`on_chunk`](Self::on_chunk).
/// Only the most recent report is kept; the tracker is dropped with the attempt.
#[derive(Debug)]
pub struct ProgressTracker {
    bytes_downloaded: u64,
    started: Instant,
    last_report: Option<ProgressReport>,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressTracker {
    /// Starts a tracker; elapsed time is measured from this call.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bytes_downloaded: 0,
            started: Instant::now(),
            last_report: None,
        }
    }

    /// Cumulative bytes recorded so far.
    #[must_use]
    pub fn bytes_downloaded(&self) -> u64 {
        self.bytes_downloaded
    }

    /// The report most recently returned by [`on_chunk`](Self::on_chunk).
    #[must_use]
    pub fn last_report(&self) -> Option<ProgressReport> {
        self.last_report
    }

    /// Records one transferred chunk.
    ///
    /// `count` is the number of chunks transferred before this one (0-indexed).
    /// Returns a report on every [`PROGRESS_REPORT_INTERVAL`]th call.
    pub fn on_chunk(
        &mut self,
        count: u64,
        chunk_size: u64,
        total_size: Option<u64>,
    ) -> Option<ProgressReport> {
        self.bytes_downloaded = self.bytes_downloaded.saturating_add(chunk_size);

        if count % PROGRESS_REPORT_INTERVAL != 0 {
            return None;
        }

        let report = self.snapshot(total_size);
        self.last_report = Some(report);
        Some(report)
    }

    /// Builds a report from the current state regardless of cadence.
    #[must_use]
    pub fn snapshot(&self, total_size: Option<u64>) -> ProgressReport {
        ProgressReport {
            bytes_downloaded: self.bytes_downloaded,
            total_bytes: total_size,
            elapsed: self.started.elapsed(),
        }
    }
}
