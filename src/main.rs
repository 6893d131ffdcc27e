//! CLI entry point for the podcast crawler.

use anyhow::{Context, Result};
use clap::Parser;
use podcrawl_core::{CrawlConfig, ShowCrawler};
use tracing::{debug, info, warn};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    let config = CrawlConfig::new(&args.show_url)
        .with_output_dir(&args.output_dir)
        .with_page_attempts(args.page_attempts)
        .with_download_attempts(args.download_attempts)
        .with_timeouts(args.connect_timeout, args.read_timeout);

    let crawler = ShowCrawler::from_config(&config)?;

    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .with_context(|| format!("creating output directory {}", config.output_dir.display()))?;

    let report = crawler.crawl().await;

    if !report.show_reachable {
        warn!(url = %config.show_url, "show page unreachable; nothing downloaded");
    }

    info!(
        episodes = report.episodes_found,
        unreachable = report.episodes_unreachable,
        media = report.media_found,
        downloaded = report.downloaded,
        skipped = report.skipped,
        unusable = report.unusable,
        failed = report.failed,
        complete = report.is_complete(),
        "Crawl finished"
    );

    Ok(())
}
