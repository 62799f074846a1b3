use memberday_core::{AreaRecord, StoreRecord};

use super::{cell_text, SiteExtractor, TABLE_NOT_FOUND};
use crate::dom::DomNode;
use crate::error::ScraperError;
use crate::normalize::normalize_dates;

/// Area name used when a region table has no header cell.
pub const UNKNOWN_AREA: &str = "未知地區";

const REGION_CONTAINER_CLASS: &str = "table-responsive component";
const DAY_SEPARATOR: &str = " , ";

/// Extracts the per-region store tables from the holiday KTV member page.
///
/// Cells are not month-keyed here, so each one is normalized on its own
/// rather than through the twelve-month aggregator.
#[derive(Debug, Clone, Copy, Default)]
pub struct HolidayExtractor;

impl SiteExtractor for HolidayExtractor {
    type Output = Vec<AreaRecord>;

    fn extract<N: DomNode>(&self, root: &N) -> Result<Vec<AreaRecord>, ScraperError> {
        let containers = root.find_all("div", Some(REGION_CONTAINER_CLASS));
        if containers.is_empty() {
            return Err(ScraperError::MissingStructure(TABLE_NOT_FOUND.to_string()));
        }

        let areas = containers
            .iter()
            .filter_map(|container| container.find("table"))
            .map(|table| extract_area(&table))
            .collect();
        Ok(areas)
    }
}

fn extract_area<N: DomNode>(table: &N) -> AreaRecord {
    let area = table
        .find("thead")
        .and_then(|thead| thead.find("tr"))
        .and_then(|tr| tr.find("th"))
        .map_or_else(|| UNKNOWN_AREA.to_string(), |th| th.stripped_text());

    let rows = table
        .find("tbody")
        .map(|tbody| tbody.find_all("tr", None))
        .unwrap_or_default();

    let details = rows.iter().filter_map(extract_store).collect();

    AreaRecord { area, details }
}

fn extract_store<N: DomNode>(row: &N) -> Option<StoreRecord> {
    let cells = row.find_all("td", None);
    if cells.is_empty() {
        return None;
    }

    let Some(store_cell) = row.find("th") else {
        tracing::debug!("skipping holiday row without a store header cell");
        return None;
    };

    let member_date = cells
        .iter()
        .map(|cell| normalize_dates(&cell_text(cell)).join(DAY_SEPARATOR))
        .collect();

    Some(StoreRecord {
        store: store_cell.stripped_text(),
        member_date,
    })
}
