//! Show and episode page retrieval with bounded retry.

use tracing::instrument;
use url::Url;

use crate::download::constants::PAGE_FETCH_ATTEMPTS;
use crate::download::{HttpClient, RetryPolicy};

/// A page body together with the URL it was finally served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// URL after redirects; relative links resolve against it.
    pub url: Url,
    /// Response body decoded as text.
    pub body: String,
}

/// Fetches pages as text, retrying each up to its attempt ceiling.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: HttpClient,
    retry: RetryPolicy,
}

impl PageFetcher {
    /// Creates a fetcher with the default 5 attempts per page.
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self::with_retry(client, RetryPolicy::with_max_attempts(PAGE_FETCH_ATTEMPTS))
    }

    /// Creates a fetcher with a custom retry policy.
    #[must_use]
    pub fn with_retry(client: HttpClient, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    /// Fetches `url`, returning `None` once every attempt has failed.
    ///
    /// An unreachable page is not fatal; callers skip it and carry on.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch(&self, url: &str) -> Option<FetchedPage> {
        let client = &self.client;
        self.retry
            .run("page fetch", move |_| client.get_text(url))
            .await
            .map(|(url, body)| FetchedPage { url, body })
    }
}
