//! Podcast Crawler Core Library
//!
//! This library crawls a single podcast show page, follows every episode
//! link it finds, and downloads the media file each episode page references.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`config`] - Crawl configuration and validation
//! - [`crawl`] - Show/episode traversal and link extraction
//! - [`download`] - HTTP client, bounded retry, progress, and media downloads

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod crawl;
pub mod download;
mod user_agent;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use config::{ConfigError, CrawlConfig};
pub use crawl::{CrawlReport, FetchedPage, LinkExtractor, PageFetcher, ShowCrawler};
pub use download::{
    DownloadError, DownloadOutcome, FileDownloader, HttpClient, ProgressReport, ProgressTracker,
    RetryPolicy, local_filename,
};
