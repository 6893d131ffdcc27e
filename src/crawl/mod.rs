//! Two-level show crawl: show page → episode pages → media files.
//!
//! [`ShowCrawler::crawl`] fetches the show page, collects the distinct
//! episode links on it, then visits each episode page and hands every media
//! link found there to the [`FileDownloader`]. Work is strictly sequential;
//! one request is in flight at a time.
//!
//! Nothing in the traversal is fatal. An unreachable show page ends the crawl
//! with an empty report; an unreachable episode page or a failed download is
//! logged and counted, and the crawl moves on.
//!
//! # Example
//!
//! ```no_run
//! use podcrawl_core::{CrawlConfig, ShowCrawler};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CrawlConfig::new("http://podbay.fm/show/216713308").with_output_dir("./episodes");
//! let crawler = ShowCrawler::from_config(&config)?;
//! let report = crawler.crawl().await;
//! println!("downloaded {} new files", report.downloaded);
//! # Ok(())
//! # }
//! ```

pub mod links;
mod page;

use std::collections::BTreeSet;

use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::config::{ConfigError, CrawlConfig};
use crate::download::{DownloadOutcome, FileDownloader, HttpClient, RetryPolicy};

pub use links::{LinkExtractor, LinkKind};
pub use page::{FetchedPage, PageFetcher};

/// Counters describing one crawl run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Whether the show page itself was fetched.
    pub show_reachable: bool,
    /// Distinct episode links discovered on the show page.
    pub episodes_found: usize,
    /// Episode pages that could not be fetched.
    pub episodes_unreachable: usize,
    /// Media links discovered across all episode pages (not deduplicated).
    pub media_found: usize,
    /// Media files transferred in this run.
    pub downloaded: usize,
    /// Media files skipped because they were already on disk.
    pub skipped: usize,
    /// Media links with no usable local filename.
    pub unusable: usize,
    /// Media files whose every download attempt failed.
    pub failed: usize,
}

impl CrawlReport {
    /// Whether every discovered episode and media file was handled without failure.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.show_reachable
            && self.episodes_unreachable == 0
            && self.failed == 0
            && self.unusable == 0
    }

    fn record(&mut self, outcome: &DownloadOutcome) {
        match outcome {
            DownloadOutcome::Downloaded { .. } => self.downloaded += 1,
            DownloadOutcome::AlreadyPresent { .. } => self.skipped += 1,
            DownloadOutcome::UnusableName => self.unusable += 1,
            DownloadOutcome::Failed { .. } => self.failed += 1,
        }
    }
}

/// Drives the page fetcher, link extractor, and downloader over one show.
#[derive(Debug, Clone)]
pub struct ShowCrawler {
    show_url: String,
    fetcher: PageFetcher,
    extractor: LinkExtractor,
    downloader: FileDownloader,
}

impl ShowCrawler {
    /// Assembles a crawler from explicit components.
    #[must_use]
    pub fn new(
        show_url: impl Into<String>,
        fetcher: PageFetcher,
        extractor: LinkExtractor,
        downloader: FileDownloader,
    ) -> Self {
        Self {
            show_url: show_url.into(),
            fetcher,
            extractor,
            downloader,
        }
    }

    /// Validates `config` and builds a crawler with the default link patterns.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config is invalid or the HTTP client
    /// cannot be built.
    pub fn from_config(config: &CrawlConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let client =
            HttpClient::with_timeouts(config.connect_timeout_secs, config.read_timeout_secs)?;
        let fetcher = PageFetcher::with_retry(
            client.clone(),
            RetryPolicy::with_max_attempts(config.page_attempts),
        );
        let downloader = FileDownloader::with_retry(
            client,
            config.output_dir.clone(),
            RetryPolicy::with_max_attempts(config.download_attempts),
        );
        Ok(Self::new(
            config.show_url.clone(),
            fetcher,
            LinkExtractor::default(),
            downloader,
        ))
    }

    /// Replaces the link extractor (e.g. for a different show host).
    #[must_use]
    pub fn with_extractor(mut self, extractor: LinkExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// The show page this crawler starts from.
    #[must_use]
    pub fn show_url(&self) -> &str {
        &self.show_url
    }

    /// Crawls the show and downloads every media file not already on disk.
    #[instrument(skip(self), fields(show = %self.show_url))]
    pub async fn crawl(&self) -> CrawlReport {
        let mut report = CrawlReport::default();
        info!("starting scrape");

        let Some(show_page) = self.fetcher.fetch(&self.show_url).await else {
            warn!(url = %self.show_url, "failed to scrape show page");
            return report;
        };
        report.show_reachable = true;

        let episodes: BTreeSet<String> =
            resolve_links(&show_page.url, self.extractor.episode_links(&show_page.body))
                .map(|(_, resolved)| resolved)
                .collect();
        report.episodes_found = episodes.len();
        info!(episodes = episodes.len(), "matched episode links");

        let total = episodes.len();
        for (index, episode_url) in episodes.iter().enumerate() {
            info!(episode = index + 1, total, url = %episode_url, "processing episode");
            self.crawl_episode(episode_url, &mut report).await;
        }

        info!(
            downloaded = report.downloaded,
            skipped = report.skipped,
            failed = report.failed,
            unreachable = report.episodes_unreachable,
            "finished scraping show"
        );
        report
    }

    async fn crawl_episode(&self, episode_url: &str, report: &mut CrawlReport) {
        let Some(page) = self.fetcher.fetch(episode_url).await else {
            warn!(url = %episode_url, "failed to scrape episode page");
            report.episodes_unreachable += 1;
            return;
        };

        let media: Vec<(&str, String)> =
            resolve_links(&page.url, self.extractor.media_links(&page.body)).collect();
        report.media_found += media.len();
        debug!(url = %episode_url, media = media.len(), "matched media links");

        for (link, media_url) in &media {
            let outcome = self.downloader.download_resolved(link, media_url).await;
            report.record(&outcome);
        }
    }
}

/// Pairs each raw link with its resolution against the page it came from.
///
/// Absolute links resolve to themselves, modulo URL normalization.
fn resolve_links<'a>(base: &'a Url, raw: Vec<&'a str>) -> impl Iterator<Item = (&'a str, String)> {
    raw.into_iter().filter_map(move |link| match base.join(link) {
        Ok(resolved) => Some((link, resolved.to_string())),
        Err(e) => {
            warn!(link, error = %e, "dropping unresolvable link");
            None
        }
    })
}
