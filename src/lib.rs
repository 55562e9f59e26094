//! Crawl-o-matic: a paced, same-host site crawler
//!
//! This crate crawls a website from a single seed address, following anchor
//! links within the seed's host, and produces a stream of pages together
//! with the links found on each of them.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use crawl_o_matic::crawler::start_crawl;
//!
//! # async fn example() -> Result<(), crawl_o_matic::CrawlError> {
//! let mut pages = start_crawl("https://example.com/", Duration::from_millis(50), 4).await?;
//! while let Some(page) = pages.next().await {
//!     println!("{} -> {} links", page.address(), page.links.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod crawler;
pub mod output;
pub mod url;

use thiserror::Error;

/// Errors returned when a crawl cannot be started
///
/// Failures that happen while the crawl is running (unreachable pages,
/// malformed links) never surface here; they are recovered locally by
/// dropping the affected page or link.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Malformed URL '{url}': {reason}")]
    MalformedUrl { url: String, reason: String },

    #[error("Not an absolute URL: '{0}'")]
    NotAbsolute(String),

    #[error("Not an http(s) URL: '{url}' (scheme '{scheme}')")]
    UnsupportedScheme { url: String, scheme: String },

    #[error("Tick interval must be greater than zero")]
    InvalidInterval,

    #[error("Max concurrency must be at least 1, got {0}")]
    InvalidConcurrency(usize),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{start_crawl, start_crawl_with, CrawlOptions, DispatchPolicy, Page, PageStream};
pub use crate::url::{resolve_href, validate_seed, SiteScope};
