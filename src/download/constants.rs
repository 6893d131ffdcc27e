//! Constants for the download module (timeouts, attempt ceilings, progress cadence).

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout: the longest gap between reads (5 minutes).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Attempts allowed when fetching a show or episode page.
pub const PAGE_FETCH_ATTEMPTS: u32 = 5;

/// Attempts allowed when streaming a media file to disk.
pub const MEDIA_DOWNLOAD_ATTEMPTS: u32 = 10;

/// A progress report is emitted on every Nth chunk callback.
pub const PROGRESS_REPORT_INTERVAL: u64 = 64;

/// Bytes per megabyte used for progress and rate figures.
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Suffix for in-flight downloads; renamed away on success.
pub const PARTIAL_SUFFIX: &str = ".part";
