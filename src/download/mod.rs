//! HTTP download engine for streaming media files to disk.
//!
//! This module provides the network side of the crawler: a shared HTTP
//! client, the bounded retry used by every network operation, per-attempt
//! progress accounting, and the skip-if-present media downloader.
//!
//! # Features
//!
//! - Streaming downloads (memory-efficient for large files)
//! - Immediate, bounded retry that never propagates errors
//! - Progress reports every 64th chunk with MB/s throughput
//! - Atomic `.part` + rename so reruns never see truncated files
//!
//! # Example
//!
//! ```no_run
//! use podcrawl_core::download::{DownloadOutcome, FileDownloader, HttpClient};
//!
//! # async fn example() {
//! let downloader = FileDownloader::new(HttpClient::new(), ".");
//! match downloader.download("https://cdn.example.com/show/ep1.mp3").await {
//!     DownloadOutcome::Downloaded { path, .. } => println!("saved {}", path.display()),
//!     other => println!("not downloaded: {other:?}"),
//! }
//! # }
//! ```

mod client;
pub mod constants;
mod error;
mod filename;
mod media;
mod progress;
mod retry;

pub use client::HttpClient;
pub use constants::{MEDIA_DOWNLOAD_ATTEMPTS, PAGE_FETCH_ATTEMPTS};
pub use error::DownloadError;
pub use filename::local_filename;
pub use media::{DownloadOutcome, FileDownloader};
pub use progress::{ProgressReport, ProgressTracker};
pub use retry::RetryPolicy;
