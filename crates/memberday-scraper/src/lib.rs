pub mod client;
pub mod dom;
pub mod error;
pub mod extract;
pub mod normalize;

pub use client::PageClient;
pub use dom::DomNode;
pub use error::ScraperError;
pub use extract::{HolidayExtractor, PartyWorldExtractor, SiteExtractor};
pub use normalize::{aggregate_months, normalize_dates};
