//! Crawl-o-matic main entry point
//!
//! This is the command-line interface: it crawls one site and writes the
//! result as a plain-text sitemap.

use anyhow::{Context, Result};
use clap::Parser;
use crawl_o_matic::config::{load_config_with_hash, validate, Config};
use crawl_o_matic::crawler::{build_http_client, start_crawl_with, CrawlOptions, DispatchPolicy};
use crawl_o_matic::output::{log_statistics, CrawlStatistics, PageSink, SitemapWriter};
use crawl_o_matic::url::{validate_seed, SiteScope};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Crawl-o-matic: a paced, same-host site crawler
///
/// Crawls every page reachable from the seed URL on the same host and
/// writes each page with the links found on it to a sitemap file.
#[derive(Parser, Debug)]
#[command(name = "crawl-o-matic")]
#[command(version)]
#[command(about = "A paced, same-host site crawler", long_about = None)]
struct Cli {
    /// Seed URL to start crawling
    #[arg(long, value_name = "URL")]
    url: String,

    /// Path where to write the sitemap
    #[arg(long, value_name = "PATH")]
    output: PathBuf,

    /// Interval between dispatch ticks, in milliseconds
    #[arg(long, value_name = "MS")]
    interval_ms: Option<u64>,

    /// Work queue capacity (and fetch ceiling with --dispatch fill-headroom)
    #[arg(long, value_name = "N")]
    max_concurrent: Option<usize>,

    /// Dispatch policy: one-per-tick or fill-headroom
    #[arg(long, value_name = "POLICY")]
    dispatch: Option<DispatchPolicy>,

    /// Optional TOML configuration file
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;
    let seed = validate_seed(&cli.url)?;
    let scope = SiteScope::of(&seed).context("seed URL has no host")?;

    let mut sitemap = SitemapWriter::create(&cli.output)?;
    let client = build_http_client(&config.user_agent).context("failed to build HTTP client")?;
    let options = CrawlOptions::from(&config.crawler);

    let mut pages = start_crawl_with(seed.as_str(), options, client).await?;
    let mut stats = CrawlStatistics::start(scope);

    while let Some(page) = pages.next().await {
        tracing::info!("{}", page.address());
        stats.record(&page);
        sitemap
            .write_page(&page)
            .with_context(|| format!("failed to write {}", cli.output.display()))?;
    }

    sitemap.finish()?;
    log_statistics(&stats);

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("crawl_o_matic=info,warn"),
            1 => EnvFilter::new("crawl_o_matic=debug,info"),
            2 => EnvFilter::new("crawl_o_matic=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Builds the effective configuration: defaults, then the config file, then flags
fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(interval_ms) = cli.interval_ms {
        config.crawler.interval_ms = interval_ms;
    }
    if let Some(max_concurrent) = cli.max_concurrent {
        config.crawler.max_concurrent = max_concurrent;
    }
    if let Some(dispatch) = cli.dispatch {
        config.crawler.dispatch = dispatch;
    }

    validate(&config).context("invalid crawler settings")?;
    Ok(config)
}
