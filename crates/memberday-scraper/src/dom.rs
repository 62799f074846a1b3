//! Narrow DOM capability used by the site extractors.
//!
//! Extractors only ever need "find descendants by tag and class" and "read
//! the text", so they are written against [`DomNode`] rather than a concrete
//! parser type. [`scraper::ElementRef`] is the production implementation.

use scraper::{ElementRef, Selector};

/// Read-only view of an element: descendant lookup and text extraction.
pub trait DomNode: Sized {
    /// All descendants with the given tag, optionally restricted to elements
    /// carrying every class in the whitespace-separated `class` list.
    ///
    /// Class matching is set-based: order and extra classes on the element
    /// are ignored, so `"table-responsive component"` also matches
    /// `class="component extra table-responsive"`. It is not a comparison
    /// against the exact attribute string.
    fn find_all(&self, tag: &str, class: Option<&str>) -> Vec<Self>;

    /// First descendant with the given tag.
    fn find(&self, tag: &str) -> Option<Self> {
        self.find_all(tag, None).into_iter().next()
    }

    /// Every descendant text node, trimmed, with empty pieces dropped and the
    /// rest concatenated.
    fn stripped_text(&self) -> String;
}

fn build_selector(tag: &str, class: Option<&str>) -> Option<Selector> {
    let mut css = tag.to_owned();
    if let Some(class) = class {
        for name in class.split_whitespace() {
            css.push('.');
            css.push_str(name);
        }
    }
    let selector = match Selector::parse(&css) {
        Ok(selector) => Some(selector),
        Err(error) => {
            tracing::warn!(selector = %css, error = ?error, "invalid selector");
            None
        }
    };
    selector
}

impl DomNode for ElementRef<'_> {
    fn find_all(&self, tag: &str, class: Option<&str>) -> Vec<Self> {
        build_selector(tag, class)
            .map(|selector| self.select(&selector).collect())
            .unwrap_or_default()
    }

    fn stripped_text(&self) -> String {
        ElementRef::text(self)
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .collect()
    }
}
