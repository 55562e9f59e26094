//! Work queue, in-flight accounting and dispatch policy
//!
//! This module handles:
//! - The bounded FIFO of addresses awaiting a fetch
//! - Counting workers that are currently running
//! - Deciding how many queued addresses may start on a single tick

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use url::Url;

/// How many queued addresses the dispatcher may start per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DispatchPolicy {
    /// At most one worker per tick; `max_concurrency` only sizes the queue
    #[default]
    OnePerTick,

    /// Start workers until `max_concurrency` fetches are running
    FillHeadroom,
}

impl DispatchPolicy {
    /// Returns how many workers may be started this tick
    ///
    /// # Arguments
    ///
    /// * `max_concurrency` - The configured concurrency ceiling
    /// * `fetching` - Workers dispatched whose fetch has not completed yet
    ///
    /// Workers past their fetch, for example ones waiting to enqueue links,
    /// do not use up headroom.
    pub fn budget(&self, max_concurrency: usize, fetching: usize) -> usize {
        match self {
            Self::OnePerTick => 1,
            Self::FillHeadroom => max_concurrency.saturating_sub(fetching),
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::OnePerTick => "one-per-tick",
            Self::FillHeadroom => "fill-headroom",
        }
    }
}

impl fmt::Display for DispatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DispatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "one-per-tick" => Ok(Self::OnePerTick),
            "fill-headroom" => Ok(Self::FillHeadroom),
            other => Err(format!(
                "unknown dispatch policy '{}', expected 'one-per-tick' or 'fill-headroom'",
                other
            )),
        }
    }
}

/// Creates a bounded work queue
///
/// Returns the producer half, cloned into every worker, and the consumer
/// half owned by the dispatcher.
pub fn work_queue(capacity: usize) -> (WorkQueue, Backlog) {
    let (tx, rx) = mpsc::channel(capacity);
    (WorkQueue { tx }, Backlog { rx })
}

/// Producer side of the work queue
#[derive(Debug, Clone)]
pub struct WorkQueue {
    tx: mpsc::Sender<Url>,
}

impl WorkQueue {
    /// Enqueues an address, waiting while the queue is full
    ///
    /// Returns false if the dispatcher has already gone away.
    pub async fn push(&self, url: Url) -> bool {
        self.tx.send(url).await.is_ok()
    }
}

/// Consumer side of the work queue
#[derive(Debug)]
pub struct Backlog {
    rx: mpsc::Receiver<Url>,
}

impl Backlog {
    /// Takes the oldest queued address without waiting
    pub fn try_pop(&mut self) -> Option<Url> {
        self.rx.try_recv().ok()
    }
}

/// Counter of workers currently executing
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    count: Arc<AtomicUsize>,
}

impl InFlight {
    /// Creates a counter starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the counter; it is decremented when the guard drops
    pub fn enter(&self) -> InFlightGuard {
        self.count.fetch_add(1, Ordering::SeqCst);
        InFlightGuard {
            count: Arc::clone(&self.count),
        }
    }

    /// Number of workers currently running
    pub fn current(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Returns true if no worker is running
    pub fn is_idle(&self) -> bool {
        self.current() == 0
    }
}

/// Keeps one worker counted as in flight for as long as it lives
#[derive(Debug)]
pub struct InFlightGuard {
    count: Arc<AtomicUsize>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.count.fetch_sub(1, Ordering::SeqCst);
    }
}
