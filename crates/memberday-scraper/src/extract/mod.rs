//! Site-specific extraction of member-day tables.
//!
//! Each extractor walks a fixed page shape through [`DomNode`] and feeds
//! every cell through [`crate::normalize`].

mod holiday;
mod party_world;

use scraper::Html;

use crate::dom::DomNode;
use crate::error::ScraperError;

pub use holiday::{HolidayExtractor, UNKNOWN_AREA};
pub use party_world::{PartyWorldExtractor, DEFAULT_YEARS, YEAR_COLUMN_NOT_FOUND};

/// Message used when a page carries none of the expected tables.
pub const TABLE_NOT_FOUND: &str = "未找到表格";

pub trait SiteExtractor {
    type Output;

    /// Builds the structured result from the document root.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::MissingStructure`] when the page lacks the
    /// tables or columns the site is expected to carry.
    fn extract<N: DomNode>(&self, root: &N) -> Result<Self::Output, ScraperError>;

    /// Parses `html` and runs [`SiteExtractor::extract`] on it.
    ///
    /// # Errors
    ///
    /// See [`SiteExtractor::extract`].
    fn extract_html(&self, html: &str) -> Result<Self::Output, ScraperError> {
        let document = Html::parse_document(html);
        self.extract(&document.root_element())
    }
}

/// Cell text with embedded line breaks turned into commas.
fn cell_text<N: DomNode>(cell: &N) -> String {
    cell.stripped_text().replace('\n', ",")
}
