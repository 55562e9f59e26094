//! URL handling module for Crawl-o-matic
//!
//! This module provides seed validation, href resolution and the same-host
//! scope rule that decides which discovered addresses may be fetched.

mod domain;
mod resolve;
mod seed;

// Re-export main functions
pub use domain::SiteScope;
pub use resolve::resolve_href;
pub use seed::validate_seed;

/// Returns true if `raw` may be read as a relative reference.
///
/// The first segment of a relative-path reference cannot contain a colon,
/// so `seriously@malformed://url` is rejected while `/foo`, `foo/bar` and
/// the empty string are accepted.
pub(crate) fn is_relative_reference(raw: &str) -> bool {
    let first_segment = raw
        .trim()
        .split(|c| matches!(c, '/' | '?' | '#'))
        .next()
        .unwrap_or("");

    !first_segment.contains(':')
}

/// Returns true for the schemes the crawler is willing to fetch
pub(crate) fn is_http_scheme(scheme: &str) -> bool {
    scheme == "http" || scheme == "https"
}
