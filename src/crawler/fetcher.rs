//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests to fetch page content
//! - Error classification for logging

use crate::config::UserAgentConfig;
use reqwest::{redirect::Policy, Client};
use url::Url;

/// Longest redirect chain followed before a fetch is abandoned
const MAX_REDIRECTS: usize = 10;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// A body was retrieved, whatever the status code
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Redirect error (loop, too many redirects)
    RedirectError {
        /// Error description
        error: String,
    },

    /// Network or protocol error (connection refused, reset, bad response)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are followed up to a fixed limit. No request timeout is set;
/// only the transport's own limits apply.
///
/// # Example
///
/// ```no_run
/// use crawl_o_matic::config::UserAgentConfig;
/// use crawl_o_matic::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page body
///
/// The status code is recorded but not checked: a 404 or 500 page with a
/// body is still a successful fetch.
pub async fn fetch_page(client: &Client, url: &Url) -> FetchResult {
    let response = match client.get(url.as_str()).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(e),
    };

    let status_code = response.status().as_u16();
    let final_url = response.url().to_string();

    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code,
            body,
        },
        Err(e) => classify_error(e),
    }
}

fn classify_error(e: reqwest::Error) -> FetchResult {
    if e.is_redirect() {
        FetchResult::RedirectError {
            error: e.to_string(),
        }
    } else if e.is_connect() {
        FetchResult::NetworkError {
            error: format!("Connection failed: {}", e),
        }
    } else {
        FetchResult::NetworkError {
            error: e.to_string(),
        }
    }
}
