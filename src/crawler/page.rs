//! Page records and the stream that carries them out of a crawl

use tokio::sync::mpsc;
use url::Url;

/// Buffer between workers and the stream consumer
///
/// Kept at one so a worker's publish completes only once the consumer has
/// caught up with the previous page.
const PAGE_BUFFER: usize = 1;

/// A visited page and the links found on it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// The address that was fetched
    pub url: Url,

    /// Outgoing http(s) links, deduplicated, in order of first appearance
    pub links: Vec<Url>,
}

impl Page {
    pub fn new(url: Url, links: Vec<Url>) -> Self {
        Self { url, links }
    }

    /// The page's address as a string
    pub fn address(&self) -> &str {
        self.url.as_str()
    }

    /// Returns true if the page links to `address`
    pub fn has_link(&self, address: &str) -> bool {
        self.links.iter().any(|link| link.as_str() == address)
    }
}

/// Creates the channel that connects workers to the consumer
pub(crate) fn page_channel() -> (mpsc::Sender<Page>, PageStream) {
    let (tx, rx) = mpsc::channel(PAGE_BUFFER);
    (tx, PageStream { rx })
}

/// Stream of pages produced by a running crawl
///
/// Pages arrive in the order their fetches complete. The stream ends once
/// the crawl has finished; there is no separate completion signal.
/// Dropping the stream makes the dispatcher stop starting new fetches.
#[derive(Debug)]
pub struct PageStream {
    rx: mpsc::Receiver<Page>,
}

impl PageStream {
    /// Waits for the next page, or None when the crawl is complete
    pub async fn next(&mut self) -> Option<Page> {
        self.rx.recv().await
    }

    /// Drains the stream until the crawl completes
    pub async fn collect(mut self) -> Vec<Page> {
        let mut pages = Vec::new();
        while let Some(page) = self.next().await {
            pages.push(page);
        }
        pages
    }
}
