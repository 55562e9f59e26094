//! Configuration module for Crawl-o-matic
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section and field is optional; missing values fall back to defaults.
//!
//! # Example
//!
//! ```no_run
//! use crawl_o_matic::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawl.toml")).unwrap();
//! println!("Pacing interval: {}ms", config.crawler.interval_ms);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
