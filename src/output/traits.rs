//! Output handler traits and types

use crate::crawler::Page;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to create output file {path}: {source}")]
    Create {
        path: String,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for consumers of the page stream
///
/// A sink receives every page of a crawl, in arrival order, and is
/// finished once the stream has ended.
pub trait PageSink {
    /// Records one crawled page
    fn write_page(&mut self, page: &Page) -> OutputResult<()>;

    /// Flushes anything buffered once the crawl is complete
    fn finish(&mut self) -> OutputResult<()>;
}
