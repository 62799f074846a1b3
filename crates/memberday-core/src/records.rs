//! Structured member-day records returned by the site extractors and
//! served verbatim by the API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One store (table row) and its normalized member dates.
///
/// `member_date` has one entry per source cell; callers must not assume
/// twelve entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreRecord {
    pub store: String,
    pub member_date: Vec<String>,
}

/// One region section of the holiday site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaRecord {
    pub area: String,
    pub details: Vec<StoreRecord>,
}

/// Year label (`"2024"`, `"2025"`, ...) to the stores listed for that year.
pub type YearlyResult = BTreeMap<String, Vec<StoreRecord>>;

/// Either dataset payload, serialized without a wrapper so each endpoint
/// emits its own natural JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MemberDays {
    Areas(Vec<AreaRecord>),
    Yearly(YearlyResult),
}

/// The upstream datasets the service knows how to scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    Holiday,
    PartyWorld,
}

impl Dataset {
    /// Key under which the dataset is cached.
    #[must_use]
    pub fn cache_key(self) -> &'static str {
        match self {
            Dataset::Holiday => "holiday_data",
            Dataset::PartyWorld => "party_world_data",
        }
    }
}

impl std::fmt::Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dataset::Holiday => write!(f, "holiday"),
            Dataset::PartyWorld => write!(f, "party_world"),
        }
    }
}
