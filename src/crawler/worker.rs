//! Fetch-and-extract worker
//!
//! One worker runs per dispatched address. Its steps are ordered so the
//! dispatcher can rely on the in-flight counter: newly discovered links are
//! registered and enqueued, then the page is published, and only then is
//! the worker released from the counter.
//!
//! The fetch slot is released as soon as the fetch completes. A worker
//! blocked on a full work queue never holds one, so the dispatcher can
//! always make room for it.

use crate::crawler::coordinator::Session;
use crate::crawler::fetcher::{fetch_page, FetchResult};
use crate::crawler::page::Page;
use crate::crawler::parser::extract_links;
use crate::crawler::scheduler::InFlightGuard;
use std::sync::Arc;
use url::Url;

/// A single dispatched fetch
///
/// Fields drop in declaration order, so the session handle is released
/// before the in-flight guard.
pub(crate) struct Worker {
    session: Arc<Session>,
    url: Url,
    fetch_slot: Option<InFlightGuard>,
    _guard: InFlightGuard,
}

impl Worker {
    pub(crate) fn new(
        session: Arc<Session>,
        url: Url,
        fetch_slot: InFlightGuard,
        guard: InFlightGuard,
    ) -> Self {
        Self {
            session,
            url,
            fetch_slot: Some(fetch_slot),
            _guard: guard,
        }
    }

    /// Runs the worker to completion
    ///
    /// A failed fetch abandons the address: nothing is published and the
    /// failure is only logged.
    pub(crate) async fn run(mut self) {
        let fetched = fetch_page(&self.session.client, &self.url).await;
        drop(self.fetch_slot.take());

        let body = match fetched {
            FetchResult::Success {
                final_url,
                status_code,
                body,
            } => {
                tracing::debug!(
                    "Fetched {} (status {}, final url {}, {} bytes)",
                    self.url,
                    status_code,
                    final_url,
                    body.len()
                );
                body
            }
            FetchResult::RedirectError { error } | FetchResult::NetworkError { error } => {
                tracing::debug!("Abandoning {}: {}", self.url, error);
                return;
            }
        };

        let links = extract_links(&body, &self.url);

        for link in &links {
            if self.session.registry.register(link) {
                tracing::debug!("Queueing {}", link);
                if !self.session.queue.push(link.clone()).await {
                    tracing::debug!("Work queue closed, dropping {}", link);
                }
            }
        }

        let page = Page::new(self.url.clone(), links);
        if self.session.pages.send(page).await.is_err() {
            tracing::debug!("Page stream closed, discarding {}", self.url);
        }
    }
}
