//! HTML link extraction
//!
//! This module turns a fetched HTML body into the list of outgoing links
//! recorded on a page.

use crate::url::resolve_href;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracts the outgoing links of an HTML document
///
/// # Link Extraction Rules
///
/// - Only the `href` of `<a>` tags is considered, in document order
/// - Relative hrefs are resolved against `base_url`
/// - Hrefs that fail to parse are skipped one by one; the rest of the
///   page is still used
/// - Only `http` and `https` links are kept
/// - A link repeated on the page appears once, at its first position
///
/// Links to other hosts are kept; scope is enforced later, when links are
/// registered for fetching.
///
/// # Example
///
/// ```
/// use crawl_o_matic::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<a href="/a">A</a><a href="/a">A again</a><a href="mailto:x@y.z">mail</a>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let links = extract_links(html, &base_url);
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].as_str(), "https://example.com/a");
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();
    let mut seen = HashSet::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                match resolve_href(href, base_url) {
                    Some(link) => {
                        if seen.insert(link.as_str().to_string()) {
                            links.push(link);
                        }
                    }
                    None => tracing::trace!("Skipping href {:?} on {}", href, base_url),
                }
            }
        }
    }

    links
}
