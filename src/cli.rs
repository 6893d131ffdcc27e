//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use podcrawl_core::download::{MEDIA_DOWNLOAD_ATTEMPTS, PAGE_FETCH_ATTEMPTS};
use podcrawl_core::download::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};

/// Crawl a podcast show page and download every episode's media file.
///
/// Follows each episode link on the show page, then downloads the media
/// files referenced by every episode page into the output directory.
/// Files that already exist there are skipped.
#[derive(Parser, Debug)]
#[command(name = "podcrawl")]
#[command(author, version, about)]
pub struct Args {
    /// Show page to crawl, e.g. http://podbay.fm/show/216713308
    #[arg(value_name = "SHOW_URL")]
    pub show_url: String,

    /// Directory to save media files into
    #[arg(short = 'o', long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Attempts per show/episode page fetch (1-20)
    #[arg(long, default_value_t = PAGE_FETCH_ATTEMPTS, value_parser = clap::value_parser!(u32).range(1..=20))]
    pub page_attempts: u32,

    /// Attempts per media download (1-50)
    #[arg(long, default_value_t = MEDIA_DOWNLOAD_ATTEMPTS, value_parser = clap::value_parser!(u32).range(1..=50))]
    pub download_attempts: u32,

    /// HTTP connect timeout in seconds (1-3600)
    #[arg(long, default_value_t = CONNECT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub connect_timeout: u64,

    /// HTTP read timeout in seconds (1-3600)
    #[arg(long, default_value_t = READ_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub read_timeout: u64,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}
