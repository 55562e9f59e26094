//! Crawler module for web page fetching and processing
//!
//! This module contains the concurrent crawl engine, including:
//! - The deduplication registry and the bounded work queue
//! - The tick-paced dispatcher and its termination rule
//! - Fetch-and-extract workers
//! - The page stream handed back to the caller

mod coordinator;
mod fetcher;
mod page;
mod parser;
mod registry;
mod scheduler;
mod worker;

pub use coordinator::{Coordinator, CrawlOptions};
pub use fetcher::{build_http_client, fetch_page, FetchResult};
pub use page::{Page, PageStream};
pub use parser::extract_links;
pub use registry::Registry;
pub use scheduler::{work_queue, Backlog, DispatchPolicy, InFlight, InFlightGuard, WorkQueue};

use crate::config::UserAgentConfig;
use crate::url::validate_seed;
use crate::CrawlError;
use reqwest::Client;
use std::time::Duration;

/// Starts crawling from `seed` with the default HTTP client
///
/// Every precondition is checked before anything is spawned or any
/// connection is made:
///
/// * `seed` must be an absolute `http` or `https` URL
/// * `tick_interval` must be greater than zero
/// * `max_concurrency` must be at least 1
///
/// Must be called from within a Tokio runtime.
///
/// # Returns
///
/// * `Ok(PageStream)` - Pages as they are crawled; the stream ends when the crawl completes
/// * `Err(CrawlError)` - A precondition failed and nothing was started
pub async fn start_crawl(
    seed: &str,
    tick_interval: Duration,
    max_concurrency: usize,
) -> Result<PageStream, CrawlError> {
    let options = CrawlOptions::new(tick_interval, max_concurrency);
    let seed_url = validate_seed(seed)?;
    options.validate()?;

    let client = build_http_client(&UserAgentConfig::default())?;
    launch(seed_url, options, client).await
}

/// Starts crawling from `seed` with caller-provided options and client
///
/// Applies the same preconditions as [`start_crawl`].
pub async fn start_crawl_with(
    seed: &str,
    options: CrawlOptions,
    client: Client,
) -> Result<PageStream, CrawlError> {
    let seed_url = validate_seed(seed)?;
    options.validate()?;

    launch(seed_url, options, client).await
}

async fn launch(
    seed: ::url::Url,
    options: CrawlOptions,
    client: Client,
) -> Result<PageStream, CrawlError> {
    let (coordinator, stream) = Coordinator::new(seed, options, client)?;
    coordinator.launch().await;
    Ok(stream)
}
