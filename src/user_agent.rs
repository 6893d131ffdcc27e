//! User-Agent string sent with every crawler request.

/// Project URL for User-Agent identification (good citizenship; RFC 9308).
const PROJECT_UA_URL: &str = "https://github.com/fierce/podcrawl";

/// Default User-Agent for page fetches and media downloads.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("podcrawl/{version} (podcast-archiver; +{PROJECT_UA_URL})")
}
