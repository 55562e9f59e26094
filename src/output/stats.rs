//! Crawl statistics
//!
//! Counts what came out of the page stream so the end of a run can be
//! summarized in the log.

use crate::crawler::Page;
use crate::url::SiteScope;
use std::fmt;
use std::time::{Duration, Instant};

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// Number of pages received
    pub total_pages: u64,

    /// Links recorded across all pages
    pub total_links: u64,

    /// Links pointing outside the seed's host
    pub external_links: u64,

    scope: SiteScope,
    started_at: Instant,
}

impl CrawlStatistics {
    /// Starts the clock for a crawl scoped to `scope`
    pub fn start(scope: SiteScope) -> Self {
        Self {
            total_pages: 0,
            total_links: 0,
            external_links: 0,
            scope,
            started_at: Instant::now(),
        }
    }

    /// Accounts for one received page
    pub fn record(&mut self, page: &Page) {
        self.total_pages += 1;
        self.total_links += page.links.len() as u64;
        self.external_links += page
            .links
            .iter()
            .filter(|link| !self.scope.contains(link))
            .count() as u64;
    }

    /// Time since the crawl started
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Average throughput since the crawl started
    pub fn pages_per_second(&self) -> f64 {
        let seconds = self.elapsed().as_secs_f64();
        if seconds == 0.0 {
            return 0.0;
        }
        self.total_pages as f64 / seconds
    }
}

impl fmt::Display for CrawlStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Scanned {} pages in {:.2?} ({:.2}/s), {} links ({} external)",
            self.total_pages,
            self.elapsed(),
            self.pages_per_second(),
            self.total_links,
            self.external_links
        )
    }
}

/// Logs the end-of-run summary
pub fn log_statistics(stats: &CrawlStatistics) {
    tracing::info!("{}", stats);
}
