//! Episode and media link extraction from raw page text.
//!
//! Extraction is pure pattern matching with no HTML awareness. A link is any
//! run of text enclosed in double quotes that fully matches a pattern; the
//! quotes are not part of the result. Because a quoted run cannot contain a
//! quote, every candidate is exactly one segment between two consecutive
//! `"` characters, which gives the same matches as a
//! `(?<=")[^"]+…(?=")` lookaround search.
//!
//! Incidental quoted strings that happen to match are returned too; that is
//! an accepted limitation of text matching.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::config::ConfigError;

/// Default episode pattern: a quoted string on the show host ending in `autostart=1`.
pub const DEFAULT_EPISODE_PATTERN: &str = r#"[^"]+podbay.fm[^"]+autostart=1"#;

/// Default media pattern: a quoted string ending in `.mp3`.
pub const DEFAULT_MEDIA_PATTERN: &str = r#"[^"]+\.mp3"#;

#[allow(clippy::expect_used)]
static EPISODE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    anchored(DEFAULT_EPISODE_PATTERN).expect("episode regex is valid") // Static pattern, safe to panic
});

#[allow(clippy::expect_used)]
static MEDIA_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    anchored(DEFAULT_MEDIA_PATTERN).expect("media regex is valid") // Static pattern, safe to panic
});

/// Which of the two link patterns to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Links from a show page to its episode pages.
    Episode,
    /// Links from an episode page to its media file.
    Media,
}

/// Applies the episode and media patterns to page text.
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    episode: Regex,
    media: Regex,
}

impl Default for LinkExtractor {
    fn default() -> Self {
        Self {
            episode: EPISODE_PATTERN.clone(),
            media: MEDIA_PATTERN.clone(),
        }
    }
}

impl LinkExtractor {
    /// Builds an extractor from custom patterns.
    ///
    /// Each pattern must match an entire quoted run; it is anchored
    /// automatically.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if either pattern fails to compile.
    pub fn with_patterns(episode: &str, media: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            episode: anchored(episode)?,
            media: anchored(media)?,
        })
    }

    /// Returns every quoted run in `payload` matching the pattern for `kind`, in document order.
    ///
    /// # Examples
    ///
    /// ```
    /// use podcrawl_core::crawl::{LinkExtractor, LinkKind};
    ///
    /// let page = r#"<a href="http://cdn.example.com/show/ep1.mp3">play</a>"#;
    /// let links = LinkExtractor::default().extract(page, LinkKind::Media);
    /// assert_eq!(links, vec!["http://cdn.example.com/show/ep1.mp3"]);
    /// ```
    #[must_use]
    pub fn extract<'a>(&self, payload: &'a str, kind: LinkKind) -> Vec<&'a str> {
        let pattern = match kind {
            LinkKind::Episode => &self.episode,
            LinkKind::Media => &self.media,
        };

        let matches: Vec<&str> = quoted_runs(payload)
            .filter(|run| pattern.is_match(run))
            .collect();
        trace!(?kind, count = matches.len(), "extracted links");
        matches
    }

    /// Episode links in `payload`.
    #[must_use]
    pub fn episode_links<'a>(&self, payload: &'a str) -> Vec<&'a str> {
        self.extract(payload, LinkKind::Episode)
    }

    /// Media links in `payload`.
    #[must_use]
    pub fn media_links<'a>(&self, payload: &'a str) -> Vec<&'a str> {
        self.extract(payload, LinkKind::Media)
    }
}

/// Segments enclosed by a `"` on both sides.
fn quoted_runs(payload: &str) -> impl Iterator<Item = &str> {
    let mut segments: Vec<&str> = payload.split('"').collect();
    // The first segment has no opening quote and the last no closing quote.
    if segments.len() < 3 {
        segments.clear();
    } else {
        segments.pop();
        segments.remove(0);
    }
    segments.into_iter()
}

fn anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})$"))
}
