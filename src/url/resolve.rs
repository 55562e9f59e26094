use crate::url::{is_http_scheme, is_relative_reference};
use url::{ParseError, Url};

/// Resolves an `href` attribute value to an absolute http(s) URL
///
/// Absolute hrefs are kept as they are. Relative hrefs are resolved against
/// `base`, inheriting its scheme, host, port and user-info.
///
/// Returns None if the link should be dropped:
/// - The href does not parse as a URL or relative reference
/// - The resolved scheme is not `http` or `https` (`mailto:`, `javascript:`, ...)
///
/// No normalization happens beyond what parsing performs: fragments,
/// trailing slashes and query strings are kept as written.
///
/// # Examples
///
/// ```
/// use crawl_o_matic::url::resolve_href;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/docs/").unwrap();
/// let link = resolve_href("/about", &base).unwrap();
/// assert_eq!(link.as_str(), "https://example.com/about");
///
/// assert!(resolve_href("mailto:team@example.com", &base).is_none());
/// ```
pub fn resolve_href(href: &str, base: &Url) -> Option<Url> {
    let resolved = match Url::parse(href) {
        Ok(url) => url,
        Err(ParseError::RelativeUrlWithoutBase) if is_relative_reference(href) => {
            base.join(href).ok()?
        }
        Err(_) => return None,
    };

    if is_http_scheme(resolved.scheme()) {
        Some(resolved)
    } else {
        None
    }
}
