use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The page was fetched but the expected tables or columns are absent.
    #[error("{0}")]
    MissingStructure(String),
}

impl ScraperError {
    /// `true` when the failure happened while retrieving the page rather
    /// than while reading it.
    #[must_use]
    pub fn is_fetch(&self) -> bool {
        matches!(
            self,
            ScraperError::Http(_) | ScraperError::UnexpectedStatus { .. }
        )
    }
}
