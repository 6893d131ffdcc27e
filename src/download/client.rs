//! HTTP client wrapper for page fetches and streamed media downloads.
//!
//! Every method performs exactly one request and reports failure as a
//! [`DownloadError`]; retrying is the caller's concern.

use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use super::error::DownloadError;
use super::progress::{ProgressReport, ProgressTracker};
use crate::user_agent;

/// HTTP client shared by the page fetcher and the media downloader.
///
/// Create once and reuse; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    page_timeout: Duration,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a client with the default timeouts (30s connect, 5min between reads).
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the static configuration.
    /// This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self::with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
            .expect("failed to build HTTP client with static configuration")
    }

    /// Creates a client with explicit timeout values.
    ///
    /// `read_timeout_secs` bounds each read from the socket, so a slow media
    /// transfer survives as long as bytes keep arriving. Page fetches are
    /// additionally capped at the same value end to end.
    ///
    /// # Errors
    ///
    /// Returns the builder error if the TLS backend cannot be initialized.
    pub fn with_timeouts(
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .read_timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .user_agent(user_agent::default_user_agent())
            .build()?;
        Ok(Self {
            client,
            page_timeout: Duration::from_secs(read_timeout_secs),
        })
    }

    /// Fetches `url` and returns the final URL (after redirects) and the body as text.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` for an invalid URL, a transport failure, or a
    /// non-success status.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get_text(&self, url: &str) -> Result<(Url, String), DownloadError> {
        let response = self.send_get(url, Some(self.page_timeout)).await?;
        let final_url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| DownloadError::network(url, e))?;
        debug!(bytes = body.len(), final_url = %final_url, "page fetched");
        Ok((final_url, body))
    }

    /// Streams `url` into `file_path`, feeding every chunk to `tracker`.
    ///
    /// The file is created (or truncated) before the body is read. On error
    /// the caller owns cleanup of whatever was written.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` for request failures, non-success statuses,
    /// mid-stream network errors, and filesystem errors.
    #[instrument(skip(self, tracker), fields(url = %url, path = %file_path.display()))]
    pub async fn stream_to_file(
        &self,
        url: &str,
        file_path: &Path,
        tracker: &mut ProgressTracker,
    ) -> Result<u64, DownloadError> {
        let response = self.send_get(url, None).await?;
        let total_size = response.content_length();

        let file = File::create(file_path)
            .await
            .map_err(|e| DownloadError::io(file_path, e))?;
        let mut writer = BufWriter::new(file);
        let mut stream = response.bytes_stream();
        let mut chunks: u64 = 0;

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.map_err(|e| DownloadError::network(url, e))?;

            writer
                .write_all(&chunk)
                .await
                .map_err(|e| DownloadError::io(file_path, e))?;

            if let Some(report) = tracker.on_chunk(chunks, chunk.len() as u64, total_size) {
                log_progress(&report);
            }
            chunks += 1;
        }

        // Ensure all data is flushed to disk
        writer
            .flush()
            .await
            .map_err(|e| DownloadError::io(file_path, e))?;

        Ok(tracker.bytes_downloaded())
    }

    async fn send_get(
        &self,
        url: &str,
        deadline: Option<Duration>,
    ) -> Result<reqwest::Response, DownloadError> {
        let parsed = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        let mut request = self.client.get(parsed);
        if let Some(deadline) = deadline {
            request = request.timeout(deadline);
        }
        let response = request
            .send()
            .await
            .map_err(|e| DownloadError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        Ok(response)
    }
}

fn log_progress(report: &ProgressReport) {
    let rate = report.rate_mbps();
    let downloaded = report.downloaded_mb();
    let line = match (report.percent(), report.total_mb()) {
        (Some(percent), Some(total)) => {
            format!("{percent:04.1}% done :: {rate:.2}MB/s :: {downloaded:.2}MB/{total:.2}MB")
        }
        _ => format!("{rate:.2}MB/s :: {downloaded:.2}MB"),
    };
    info!(bytes = report.bytes_downloaded, "{line}");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use crate::test_support::socket_guard::start_mock_server_or_skip;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    #[tokio::test]
    async fn test_get_text_returns_body_and_final_url() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };

        Mock::given(method("GET"))
            .and(path("/show/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<a href=\"x\">"))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new();
        let url = format!("{}/show/1", mock_server.uri());
        let (final_url, body) = client.get_text(&url).await.unwrap();

        assert_eq!(final_url.as_str(), url);
        assert_eq!(body, "<a href=\"x\">");
    }

    #[tokio::test]
    async fn test_get_text_404_is_http_status_error() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };

        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new();
        let result = client
            .get_text(&format!("{}/missing", mock_server.uri()))
            .await;

        match result {
            Err(DownloadError::HttpStatus { status, .. }) => assert_eq!(status, 404),
            other => panic!("Expected HttpStatus error, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_text_invalid_url() {
        let client = HttpClient::new();
        let result = client.get_text("not a url").await;
        assert!(matches!(result, Err(DownloadError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_stream_to_file_writes_body_and_counts_bytes() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();
        let content = vec![7_u8; 256 * 1024];

        Mock::given(method("GET"))
            .and(path("/ep1.mp3"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(content.clone()))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new();
        let target = temp_dir.path().join("ep1.mp3");
        let mut tracker = ProgressTracker::new();
        let bytes = client
            .stream_to_file(
                &format!("{}/ep1.mp3", mock_server.uri()),
                &target,
                &mut tracker,
            )
            .await
            .unwrap();

        assert_eq!(bytes, content.len() as u64);
        assert_eq!(std::fs::read(&target).unwrap(), content);
    }

    #[tokio::test]
    async fn test_stream_to_file_reports_progress_against_content_length() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();
        let content = vec![3_u8; 2 * 1024 * 1024];
        let total = content.len() as u64;

        Mock::given(method("GET"))
            .and(path("/long.mp3"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(content))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new();
        let mut tracker = ProgressTracker::new();
        client
            .stream_to_file(
                &format!("{}/long.mp3", mock_server.uri()),
                &temp_dir.path().join("long.mp3"),
                &mut tracker,
            )
            .await
            .unwrap();

        // The first chunk always reports, so at least one report exists.
        let report = tracker.last_report().unwrap();
        assert_eq!(report.total_bytes, Some(total));
        assert!(report.bytes_downloaded > 0 && report.bytes_downloaded <= total);
        let percent = report.percent().unwrap();
        assert!(percent > 0.0 && percent <= 100.0);

        let finished = tracker.snapshot(report.total_bytes);
        assert_eq!(finished.bytes_downloaded, total);
        assert!((finished.percent().unwrap() - 100.0).abs() < 1e-9);
    }

    /// Serves one response whose body trickles out in `chunks` pieces, `gap` apart.
    async fn spawn_trickling_server(chunks: usize, gap: Duration) -> Option<String> {
        use tokio::io::AsyncReadExt;
        use tokio::net::TcpListener;

        let listener = match TcpListener::bind("127.0.0.1:0").await {
            Ok(listener) => listener,
            Err(e) => {
                eprintln!("cannot bind localhost socket ({e}); skipping test");
                return None;
            }
        };
        let addr = listener.local_addr().ok()?;
        let piece = [9_u8; 1024];

        tokio::spawn(async move {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let mut request = [0_u8; 4096];
            let _ = socket.read(&mut request).await;

            let head = format!(
                "HTTP/1.1 200 OK\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
                chunks * piece.len()
            );
            if socket.write_all(head.as_bytes()).await.is_err() {
                return;
            }
            for _ in 0..chunks {
                tokio::time::sleep(gap).await;
                if socket.write_all(&piece).await.is_err() || socket.flush().await.is_err() {
                    return;
                }
            }
        });

        Some(format!("http://{addr}/slow.mp3"))
    }

    #[tokio::test]
    async fn test_stream_to_file_outlives_read_timeout_while_bytes_arrive() {
        // Five pieces 400ms apart take ~2s in total against a 1s read timeout.
        let Some(url) = spawn_trickling_server(5, Duration::from_millis(400)).await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("slow.mp3");

        let client = HttpClient::with_timeouts(1, 1).unwrap();
        let mut tracker = ProgressTracker::new();
        let bytes = client
            .stream_to_file(&url, &target, &mut tracker)
            .await
            .unwrap();

        assert_eq!(bytes, 5 * 1024);
        assert_eq!(std::fs::read(&target).unwrap().len(), 5 * 1024);
    }

    #[tokio::test]
    async fn test_get_text_is_capped_end_to_end() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };

        Mock::given(method("GET"))
            .and(path("/stalled"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("late")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;

        let client = HttpClient::with_timeouts(1, 1).unwrap();
        let result = client
            .get_text(&format!("{}/stalled", mock_server.uri()))
            .await;

        assert!(matches!(result, Err(DownloadError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_stream_to_file_error_status_creates_no_file() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .and(path("/gone.mp3"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new();
        let target = temp_dir.path().join("gone.mp3");
        let mut tracker = ProgressTracker::new();
        let result = client
            .stream_to_file(
                &format!("{}/gone.mp3", mock_server.uri()),
                &target,
                &mut tracker,
            )
            .await;

        assert!(matches!(
            result,
            Err(DownloadError::HttpStatus { status: 500, .. })
        ));
        assert!(!target.exists());
    }
}
