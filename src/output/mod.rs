//! Output module for rendering crawl results
//!
//! This module handles:
//! - Writing the page stream as a plain-text sitemap
//! - Recording crawl statistics for the end-of-run report

mod sitemap;
pub mod stats;
mod traits;

pub use sitemap::{format_page, write_page, SitemapWriter};
pub use stats::{log_statistics, CrawlStatistics};
pub use traits::{OutputError, OutputResult, PageSink};
