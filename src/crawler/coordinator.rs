//! Crawler coordinator - session setup and the dispatch loop
//!
//! This module contains the dispatcher that paces a crawl:
//! - Validating options and seeding the session
//! - Pulling queued addresses on every tick and spawning workers
//! - Deciding when no further work can appear and closing the page stream

use crate::config::CrawlerConfig;
use crate::crawler::page::{page_channel, Page, PageStream};
use crate::crawler::registry::Registry;
use crate::crawler::scheduler::{work_queue, Backlog, DispatchPolicy, InFlight, WorkQueue};
use crate::crawler::worker::Worker;
use crate::url::SiteScope;
use crate::CrawlError;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use url::Url;

/// Tuning knobs for one crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlOptions {
    /// Interval between dispatch ticks
    pub tick_interval: Duration,

    /// Work queue capacity; also the fetch ceiling under `FillHeadroom`
    pub max_concurrency: usize,

    /// How many addresses may start per tick
    pub dispatch: DispatchPolicy,
}

impl CrawlOptions {
    /// Options with the default one-per-tick dispatch policy
    pub fn new(tick_interval: Duration, max_concurrency: usize) -> Self {
        Self {
            tick_interval,
            max_concurrency,
            dispatch: DispatchPolicy::default(),
        }
    }

    pub fn with_dispatch(mut self, dispatch: DispatchPolicy) -> Self {
        self.dispatch = dispatch;
        self
    }

    /// Checks the preconditions for starting a crawl
    pub fn validate(&self) -> Result<(), CrawlError> {
        if self.tick_interval.is_zero() {
            return Err(CrawlError::InvalidInterval);
        }

        if self.max_concurrency < 1 {
            return Err(CrawlError::InvalidConcurrency(self.max_concurrency));
        }

        Ok(())
    }
}

impl From<&CrawlerConfig> for CrawlOptions {
    fn from(config: &CrawlerConfig) -> Self {
        Self {
            tick_interval: Duration::from_millis(config.interval_ms),
            max_concurrency: config.max_concurrent,
            dispatch: config.dispatch,
        }
    }
}

/// State shared by the dispatcher and every worker of one crawl
pub(crate) struct Session {
    pub(crate) client: Client,
    pub(crate) registry: Registry,
    pub(crate) queue: WorkQueue,
    pub(crate) pages: mpsc::Sender<Page>,
}

/// Owner of a crawl session and its dispatch loop
pub struct Coordinator {
    session: Arc<Session>,
    backlog: Backlog,
    in_flight: InFlight,
    fetching: InFlight,
    options: CrawlOptions,
    seed: Url,
}

impl Coordinator {
    /// Creates a coordinator for a validated seed
    ///
    /// # Returns
    ///
    /// * `Ok((Coordinator, PageStream))` - The dispatcher and its output
    /// * `Err(CrawlError)` - The options or the seed were rejected
    pub(crate) fn new(
        seed: Url,
        options: CrawlOptions,
        client: Client,
    ) -> Result<(Self, PageStream), CrawlError> {
        options.validate()?;

        let scope =
            SiteScope::of(&seed).ok_or_else(|| CrawlError::NotAbsolute(seed.to_string()))?;
        let (queue, backlog) = work_queue(options.max_concurrency);
        let (pages, stream) = page_channel();

        let session = Session {
            client,
            registry: Registry::new(scope),
            queue,
            pages,
        };

        let coordinator = Self {
            session: Arc::new(session),
            backlog,
            in_flight: InFlight::new(),
            fetching: InFlight::new(),
            options,
            seed,
        };

        Ok((coordinator, stream))
    }

    /// Seeds the session and runs the dispatch loop in the background
    pub(crate) async fn launch(self) {
        self.session.registry.register(&self.seed);
        self.session.queue.push(self.seed.clone()).await;

        tokio::spawn(self.run());
    }

    /// Runs the dispatch loop until the crawl is complete
    ///
    /// On every tick the loop starts as many queued addresses as the
    /// dispatch policy allows, given the fetches still running. A tick that
    /// finds the queue empty while no worker is running ends the crawl.
    async fn run(mut self) {
        tracing::info!(
            "Starting crawl of {} (interval {:?}, max concurrency {}, dispatch {})",
            self.seed,
            self.options.tick_interval,
            self.options.max_concurrency,
            self.options.dispatch
        );

        let mut ticker = tokio::time::interval(self.options.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut dispatched = 0usize;

        loop {
            ticker.tick().await;

            if self.session.pages.is_closed() {
                tracing::info!("Page stream dropped, no longer dispatching");
                break;
            }

            let budget = self
                .options
                .dispatch
                .budget(self.options.max_concurrency, self.fetching.current());
            let started = self.dispatch_up_to(budget);
            dispatched += started;

            if started == 0 && self.drained() {
                break;
            }
        }

        tracing::info!(
            "Crawl of {} complete: {} pages dispatched, {} addresses registered",
            self.seed,
            dispatched,
            self.session.registry.len()
        );
        // Dropping the coordinator releases the last sender and ends the stream.
    }

    /// Starts up to `budget` queued addresses, returning how many started
    fn dispatch_up_to(&mut self, budget: usize) -> usize {
        let mut started = 0;

        while started < budget {
            match self.backlog.try_pop() {
                Some(url) => {
                    self.dispatch(url);
                    started += 1;
                }
                None => break,
            }
        }

        started
    }

    /// Returns true once no more work can ever be produced
    ///
    /// Called after a tick started nothing. With the counter at zero no
    /// worker can enqueue anything anymore, but one may have enqueued and
    /// exited between the empty poll and the counter read, so the queue is
    /// polled again before giving up.
    fn drained(&mut self) -> bool {
        if !self.in_flight.is_idle() {
            return false;
        }

        match self.backlog.try_pop() {
            Some(url) => {
                self.dispatch(url);
                false
            }
            None => true,
        }
    }

    fn dispatch(&mut self, url: Url) {
        let guard = self.in_flight.enter();
        let fetch_slot = self.fetching.enter();
        tracing::debug!(
            "Dispatching {} ({} in flight, {} fetching)",
            url,
            self.in_flight.current(),
            self.fetching.current()
        );

        let worker = Worker::new(Arc::clone(&self.session), url, fetch_slot, guard);
        tokio::spawn(worker.run());
    }
}
