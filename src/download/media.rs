//! Media file downloads with skip-if-present idempotence.
//!
//! Each attempt streams into `<name>.part` and is renamed to `<name>` only
//! once the transfer finishes, so a file named after a media URL is always
//! complete. A failed attempt removes its partial file.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use super::client::HttpClient;
use super::constants::{MEDIA_DOWNLOAD_ATTEMPTS, PARTIAL_SUFFIX};
use super::error::DownloadError;
use super::filename::local_filename;
use super::progress::ProgressTracker;
use super::retry::RetryPolicy;

/// Result of handing one media URL to the [`FileDownloader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The file was transferred and is now at `path`.
    Downloaded {
        /// Final path of the media file.
        path: PathBuf,
        /// Bytes written.
        bytes: u64,
    },
    /// A file with the derived name already existed; nothing was fetched.
    AlreadyPresent {
        /// Path of the existing file.
        path: PathBuf,
    },
    /// No usable local filename could be derived from the URL.
    UnusableName,
    /// Every attempt failed.
    Failed {
        /// Number of attempts made.
        attempts: u32,
    },
}

/// Streams media files into an output directory.
#[derive(Debug, Clone)]
pub struct FileDownloader {
    client: HttpClient,
    retry: RetryPolicy,
    output_dir: PathBuf,
}

impl FileDownloader {
    /// Creates a downloader writing into `output_dir` with the default 10 attempts.
    #[must_use]
    pub fn new(client: HttpClient, output_dir: impl Into<PathBuf>) -> Self {
        Self::with_retry(
            client,
            output_dir,
            RetryPolicy::with_max_attempts(MEDIA_DOWNLOAD_ATTEMPTS),
        )
    }

    /// Creates a downloader with a custom retry policy.
    #[must_use]
    pub fn with_retry(
        client: HttpClient,
        output_dir: impl Into<PathBuf>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            client,
            retry,
            output_dir: output_dir.into(),
        }
    }

    /// Directory files are written into.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Downloads `media_url` unless its local file already exists.
    pub async fn download(&self, media_url: &str) -> DownloadOutcome {
        self.download_resolved(media_url, media_url).await
    }

    /// Downloads a link as written on a page from its resolved `request_url`.
    ///
    /// The local filename comes from `media_link` verbatim, so it matches the
    /// page text even when resolution percent-encodes or normalizes the URL.
    #[instrument(skip(self, media_link), fields(url = %request_url))]
    pub async fn download_resolved(&self, media_link: &str, request_url: &str) -> DownloadOutcome {
        let Some(filename) = local_filename(media_link) else {
            warn!(link = %media_link, "cannot derive a local filename; skipping");
            return DownloadOutcome::UnusableName;
        };

        let target = self.output_dir.join(filename);
        if is_file(&target).await {
            info!(file = %filename, "already downloaded");
            return DownloadOutcome::AlreadyPresent { path: target };
        }

        let partial = partial_path(&target);
        info!(file = %filename, "downloading");

        let (partial_ref, target_ref) = (partial.as_path(), target.as_path());
        let result = self
            .retry
            .run("media download", move |_| {
                self.attempt(request_url, partial_ref, target_ref)
            })
            .await;

        match result {
            Some(bytes) => {
                info!(path = %target.display(), bytes, "download complete");
                DownloadOutcome::Downloaded {
                    path: target,
                    bytes,
                }
            }
            None => {
                warn!(file = %filename, "giving up on download");
                DownloadOutcome::Failed {
                    attempts: self.retry.max_attempts(),
                }
            }
        }
    }

    /// One transfer attempt with a fresh tracker; cleans up on failure.
    async fn attempt(
        &self,
        url: &str,
        partial: &Path,
        target: &Path,
    ) -> Result<u64, DownloadError> {
        let mut tracker = ProgressTracker::new();
        let result = async {
            let bytes = self.client.stream_to_file(url, partial, &mut tracker).await?;
            tokio::fs::rename(partial, target)
                .await
                .map_err(|e| DownloadError::io(target, e))?;
            Ok(bytes)
        }
        .await;

        if result.is_err() {
            debug!(path = %partial.display(), "cleaning up partial file after error");
            let _ = tokio::fs::remove_file(partial).await;
        }

        result
    }
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|metadata| metadata.is_file())
}

fn partial_path(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_owned();
    name.push(PARTIAL_SUFFIX);
    PathBuf::from(name)
}
