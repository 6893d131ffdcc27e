//! Local filename derivation for media URLs.

/// Derives the local filename for a media URL: the text after the last `/`.
///
/// Derivation is pure, so the same URL always maps to the same name. Names
/// that cannot safely live in the output directory (empty, `.`, `..`, or
/// containing a backslash) yield `None`.
///
/// # Examples
///
/// ```
/// use podcrawl_core::local_filename;
///
/// assert_eq!(
///     local_filename("https://cdn.example.com/path/to/episode42.mp3"),
///     Some("episode42.mp3")
/// );
/// assert_eq!(local_filename("https://cdn.example.com/"), None);
/// ```
#[must_use]
pub fn local_filename(media_url: &str) -> Option<&str> {
    let (_, name) = media_url.rsplit_once('/')?;
    is_safe_filename(name).then_some(name)
}

fn is_safe_filename(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains('\\')
}
