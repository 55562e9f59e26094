use crate::crawler::DispatchPolicy;
use serde::Deserialize;

/// Main configuration structure for Crawl-o-matic
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Pacing interval between dispatch ticks (milliseconds)
    #[serde(rename = "interval-ms")]
    pub interval_ms: u64,

    /// Work queue capacity, and the fetch ceiling under `fill-headroom`
    #[serde(rename = "max-concurrent")]
    pub max_concurrent: usize,

    /// How many queued addresses may be dispatched per tick
    pub dispatch: DispatchPolicy,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1,
            max_concurrent: 1,
            dispatch: DispatchPolicy::OnePerTick,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `CrawlerName/Version` or `CrawlerName/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}
