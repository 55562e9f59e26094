use crate::url::{is_http_scheme, is_relative_reference};
use crate::CrawlError;
use url::{ParseError, Url};

/// Validates the starting address of a crawl
///
/// # Validation Rules
///
/// Checked in order, stopping at the first failure:
///
/// 1. The string must parse as a URL → otherwise `MalformedUrl`
/// 2. The URL must be absolute, with a scheme and a host → otherwise `NotAbsolute`
/// 3. The scheme must be `http` or `https` → otherwise `UnsupportedScheme`
///
/// A well-formed relative reference such as `/foo` or the empty string is
/// reported as `NotAbsolute` rather than `MalformedUrl`.
///
/// # Examples
///
/// ```
/// use crawl_o_matic::url::validate_seed;
///
/// let seed = validate_seed("https://example.com/start").unwrap();
/// assert_eq!(seed.host_str(), Some("example.com"));
///
/// assert!(validate_seed("/relative").is_err());
/// assert!(validate_seed("ftp://example.com/file.txt").is_err());
/// ```
pub fn validate_seed(raw: &str) -> Result<Url, CrawlError> {
    let url = match Url::parse(raw) {
        Ok(url) => url,
        Err(ParseError::RelativeUrlWithoutBase) => {
            if is_relative_reference(raw) {
                return Err(CrawlError::NotAbsolute(raw.to_string()));
            }
            return Err(CrawlError::MalformedUrl {
                url: raw.to_string(),
                reason: "first path segment of a relative reference contains ':'".to_string(),
            });
        }
        Err(e) => {
            return Err(CrawlError::MalformedUrl {
                url: raw.to_string(),
                reason: e.to_string(),
            });
        }
    };

    if url.cannot_be_a_base() || url.host_str().map_or(true, str::is_empty) {
        return Err(CrawlError::NotAbsolute(raw.to_string()));
    }

    if !is_http_scheme(url.scheme()) {
        return Err(CrawlError::UnsupportedScheme {
            url: raw.to_string(),
            scheme: url.scheme().to_string(),
        });
    }

    Ok(url)
}
