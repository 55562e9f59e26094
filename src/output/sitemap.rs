//! Plain-text sitemap output
//!
//! Each page becomes one block:
//!
//! ```text
//! [https://example.com/]
//! https://example.com/about
//! https://example.com/careers
//!
//! ```

use crate::crawler::Page;
use crate::output::traits::{OutputError, OutputResult, PageSink};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Formats one page as a sitemap block
///
/// # Example
///
/// ```
/// use crawl_o_matic::crawler::Page;
/// use crawl_o_matic::output::format_page;
/// use url::Url;
///
/// let page = Page::new(
///     Url::parse("https://example.com/").unwrap(),
///     vec![Url::parse("https://example.com/about").unwrap()],
/// );
/// assert_eq!(format_page(&page), "[https://example.com/]\nhttps://example.com/about\n\n");
/// ```
pub fn format_page(page: &Page) -> String {
    let mut block = format!("[{}]\n", page.address());
    for link in &page.links {
        block.push_str(link.as_str());
        block.push('\n');
    }
    block.push('\n');
    block
}

/// Writes one page as a sitemap block
pub fn write_page<W: Write>(writer: &mut W, page: &Page) -> io::Result<()> {
    writeln!(writer, "[{}]", page.address())?;

    for link in &page.links {
        writeln!(writer, "{}", link)?;
    }

    writeln!(writer)
}

/// Sitemap sink over any writer
pub struct SitemapWriter<W: Write> {
    writer: W,
    pages_written: u64,
}

impl SitemapWriter<BufWriter<File>> {
    /// Creates (or truncates) the sitemap file at `path`
    pub fn create(path: &Path) -> OutputResult<Self> {
        let file = File::create(path).map_err(|source| OutputError::Create {
            path: path.display().to_string(),
            source,
        })?;

        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> SitemapWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pages_written: 0,
        }
    }

    /// Number of page blocks written so far
    pub fn pages_written(&self) -> u64 {
        self.pages_written
    }

    /// Returns the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> PageSink for SitemapWriter<W> {
    fn write_page(&mut self, page: &Page) -> OutputResult<()> {
        write_page(&mut self.writer, page)?;
        self.pages_written += 1;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}
