//! Crawl configuration: the show URL plus the few knobs around it.
//!
//! The show URL is the only required input. Everything else has a default
//! matching the crawler's documented behavior (5 page attempts, 10 download
//! attempts, current directory output).

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

use crate::download::constants::{
    CONNECT_TIMEOUT_SECS, MEDIA_DOWNLOAD_ATTEMPTS, PAGE_FETCH_ATTEMPTS, READ_TIMEOUT_SECS,
};

/// Errors raised while validating a [`CrawlConfig`] or building its collaborators.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The show URL is not an absolute http(s) URL with a host.
    #[error("invalid show URL '{url}': {reason}")]
    InvalidShowUrl {
        /// The rejected URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// An attempt ceiling was set to zero.
    #[error("`{field}` must be at least 1")]
    ZeroAttempts {
        /// Name of the offending setting.
        field: &'static str,
    },

    /// A timeout fell outside `1..=3600` seconds.
    #[error("`{field}` must be within 1..=3600 seconds, got {value}")]
    InvalidTimeout {
        /// Name of the offending setting.
        field: &'static str,
        /// The rejected value.
        value: u64,
    },

    /// A link pattern failed to compile.
    #[error("invalid link pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),
}

/// Everything the crawler needs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlConfig {
    /// Root page of the show to crawl.
    pub show_url: String,
    /// Directory media files are written to.
    pub output_dir: PathBuf,
    /// Attempts per show/episode page fetch.
    pub page_attempts: u32,
    /// Attempts per media download.
    pub download_attempts: u32,
    /// HTTP connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// HTTP read timeout in seconds.
    pub read_timeout_secs: u64,
}

impl CrawlConfig {
    /// Creates a config for `show_url` with default settings.
    #[must_use]
    pub fn new(show_url: impl Into<String>) -> Self {
        Self {
            show_url: show_url.into(),
            output_dir: PathBuf::from("."),
            page_attempts: PAGE_FETCH_ATTEMPTS,
            download_attempts: MEDIA_DOWNLOAD_ATTEMPTS,
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            read_timeout_secs: READ_TIMEOUT_SECS,
        }
    }

    /// Sets the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Sets the per-page attempt ceiling.
    #[must_use]
    pub fn with_page_attempts(mut self, attempts: u32) -> Self {
        self.page_attempts = attempts;
        self
    }

    /// Sets the per-download attempt ceiling.
    #[must_use]
    pub fn with_download_attempts(mut self, attempts: u32) -> Self {
        self.download_attempts = attempts;
        self
    }

    /// Sets connect and read timeouts in seconds.
    #[must_use]
    pub fn with_timeouts(mut self, connect_secs: u64, read_secs: u64) -> Self {
        self.connect_timeout_secs = connect_secs;
        self.read_timeout_secs = read_secs;
        self
    }

    /// Validates the config against the crawler's constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] describing the first invalid setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_show_url(&self.show_url)?;
        if self.page_attempts == 0 {
            return Err(ConfigError::ZeroAttempts {
                field: "page_attempts",
            });
        }
        if self.download_attempts == 0 {
            return Err(ConfigError::ZeroAttempts {
                field: "download_attempts",
            });
        }
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs)?;
        Ok(())
    }
}

fn validate_show_url(raw: &str) -> Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidShowUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    let parsed = Url::parse(raw).map_err(|e| invalid(&e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(invalid(&format!("unsupported scheme '{scheme}'"))),
    }
    if parsed.host().is_none() {
        return Err(invalid("missing host"));
    }
    Ok(())
}

fn validate_timeout_secs(field: &'static str, value: u64) -> Result<(), ConfigError> {
    if (1..=3600).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidTimeout { field, value })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_documented_defaults() {
        let config = CrawlConfig::new("http://podbay.fm/show/216713308");
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.page_attempts, 5);
        assert_eq!(config.download_attempts, 10);
        assert_eq!(config.connect_timeout_secs, 30);
        assert_eq!(config.read_timeout_secs, 300);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_http_scheme() {
        let err = CrawlConfig::new("ftp://podbay.fm/show/1")
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidShowUrl { .. }));
        assert!(err.to_string().contains("ftp"));
    }

    #[test]
    fn test_validate_rejects_relative_url() {
        let err = CrawlConfig::new("/show/1").validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidShowUrl { .. }));
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let err = CrawlConfig::new("http://podbay.fm/show/1")
            .with_page_attempts(0)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ZeroAttempts {
                field: "page_attempts"
            }
        ));

        let err = CrawlConfig::new("http://podbay.fm/show/1")
            .with_download_attempts(0)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ZeroAttempts {
                field: "download_attempts"
            }
        ));
    }

    #[test]
    fn test_validate_rejects_out_of_range_timeouts() {
        let err = CrawlConfig::new("http://podbay.fm/show/1")
            .with_timeouts(0, 300)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout { value: 0, .. }));

        let err = CrawlConfig::new("http://podbay.fm/show/1")
            .with_timeouts(30, 3601)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout { value: 3601, .. }));
    }
}
