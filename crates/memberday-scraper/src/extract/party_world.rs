use std::collections::BTreeMap;
use std::sync::LazyLock;

use memberday_core::{StoreRecord, YearlyResult};
use regex::Regex;

use super::{cell_text, SiteExtractor, TABLE_NOT_FOUND};
use crate::dom::DomNode;
use crate::error::ScraperError;
use crate::normalize::aggregate_months;

/// Years always present in the result, even when empty.
pub const DEFAULT_YEARS: [&str; 2] = ["2024", "2025"];

pub const YEAR_COLUMN_NOT_FOUND: &str = "未找到 2024 年或 2025 年的資料欄位";

const VENDOR_TABLE_CLASS: &str = "ps-table--vendor";

static YEAR_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]{4})年").expect("valid year label regex"));

/// Extracts the yearly member-day calendars from the party world KTV page.
///
/// The header row decides which years appear in the result. Every year that
/// applies to a row receives the same twelve months, taken from all cells
/// after the store name; the year column position is not used to slice the
/// row.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartyWorldExtractor;

impl SiteExtractor for PartyWorldExtractor {
    type Output = YearlyResult;

    fn extract<N: DomNode>(&self, root: &N) -> Result<YearlyResult, ScraperError> {
        let tables = root.find_all("table", Some(VENDOR_TABLE_CLASS));
        if tables.is_empty() {
            return Err(ScraperError::MissingStructure(TABLE_NOT_FOUND.to_string()));
        }

        let mut result: YearlyResult = DEFAULT_YEARS
            .iter()
            .map(|year| ((*year).to_string(), Vec::new()))
            .collect();

        for table in &tables {
            let header_cells = table
                .find("thead")
                .map(|thead| thead.find_all("th", None))
                .unwrap_or_default();

            let year_columns = year_columns(&header_cells);
            if year_columns.is_empty() {
                return Err(ScraperError::MissingStructure(
                    YEAR_COLUMN_NOT_FOUND.to_string(),
                ));
            }

            let rows = table
                .find("tbody")
                .map(|tbody| tbody.find_all("tr", None))
                .unwrap_or_default();

            for row in &rows {
                let cells = row.find_all("td", None);
                let Some((store_cell, month_cells)) = cells.split_first() else {
                    continue;
                };

                let store = store_cell.stripped_text();
                let raw_months: Vec<String> = month_cells
                    .iter()
                    .map(|cell| cell_text(cell).replace("<br>", ","))
                    .collect();
                let member_date = aggregate_months(&raw_months);

                for (year, &index) in &year_columns {
                    if index < cells.len() {
                        result.entry(year.clone()).or_default().push(StoreRecord {
                            store: store.clone(),
                            member_date: member_date.clone(),
                        });
                    }
                }
            }
        }

        Ok(result)
    }
}

/// Maps each year label found in the header to its column index.
///
/// A cell naming several years counts for the earliest of them. A later
/// column with the same year replaces the earlier index. Only ASCII digits
/// form a year label.
fn year_columns<N: DomNode>(header_cells: &[N]) -> BTreeMap<String, usize> {
    let mut columns = BTreeMap::new();
    for (index, cell) in header_cells.iter().enumerate() {
        let label: String = cell
            .stripped_text()
            .chars()
            .filter(|c| *c != '\n' && *c != ' ')
            .collect();
        let earliest = YEAR_LABEL
            .captures_iter(&label)
            .filter_map(|captures| captures.get(1))
            .map(|m| m.as_str())
            .min();
        if let Some(year) = earliest {
            columns.insert(year.to_string(), index);
        }
    }
    columns
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    use super::*;

    fn vendor_table(header: &str, rows: &str) -> String {
        format!(
            r#"<html><body>
                 <table class="ps-table ps-table--vendor">
                   <thead><tr>{header}</tr></thead>
                   <tbody>{rows}</tbody>
                 </table>
               </body></html>"#
        )
    }

    fn record(store: &str, months: &[&str]) -> StoreRecord {
        StoreRecord {
            store: store.to_string(),
            member_date: months.iter().map(|m| (*m).to_string()).collect(),
        }
    }

    #[test]
    fn every_discovered_year_gets_the_same_months() {
        let html = vendor_table(
            "<th>門市</th><th>2024年</th><th>2025年</th>",
            "<tr><td>Shop A</td><td>1、15</td><td>0105</td><td>3</td></tr>",
        );

        let result = PartyWorldExtractor.extract_html(&html).expect("extract");

        let expected = vec![record("Shop A", &["1、15", "01、05", "3"])];
        assert_eq!(result.get("2024"), Some(&expected));
        assert_eq!(result.get("2025"), Some(&expected));
    }

    #[test]
    fn default_years_are_present_even_when_not_in_header() {
        let html = vendor_table(
            "<th>門市</th><th>2024年 會員日</th>",
            "<tr><td>Shop B</td><td>8</td></tr>",
        );

        let result = PartyWorldExtractor.extract_html(&html).expect("extract");

        assert_eq!(result.get("2024").map(Vec::len), Some(1));
        assert_eq!(result.get("2025"), Some(&Vec::new()));
    }

    #[test]
    fn additional_years_are_discovered_from_header() {
        let html = vendor_table(
            "<th>門市</th><th>2026 年</th>",
            "<tr><td>Shop C</td><td>2</td></tr>",
        );

        let result = PartyWorldExtractor.extract_html(&html).expect("extract");

        let keys: Vec<&str> = result.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["2024", "2025", "2026"]);
        assert_eq!(result["2026"], vec![record("Shop C", &["2"])]);
    }

    #[test]
    fn full_width_digits_are_not_a_year_label() {
        let html = Html::parse_document(&vendor_table(
            "<th>門市</th><th>２０２５年</th><th>2025年</th>",
            "",
        ));
        let header = html.root_element().find_all("th", None);

        let columns = year_columns(&header);

        assert_eq!(columns, BTreeMap::from([("2025".to_string(), 2)]));
    }

    #[test]
    fn cell_with_several_years_maps_to_the_earliest() {
        let html = Html::parse_document(&vendor_table(
            "<th>門市</th><th>2025年與2024年</th>",
            "",
        ));
        let header = html.root_element().find_all("th", None);

        let columns = year_columns(&header);

        assert_eq!(columns, BTreeMap::from([("2024".to_string(), 1)]));
    }

    #[test]
    fn months_are_capped_at_twelve() {
        let cells: String = (1..=14).map(|d| format!("<td>{d}</td>")).collect();
        let html = vendor_table(
            "<th>門市</th><th>2025年</th>",
            &format!("<tr><td>Shop D</td>{cells}</tr>"),
        );

        let result = PartyWorldExtractor.extract_html(&html).expect("extract");

        assert_eq!(result["2025"][0].member_date.len(), 12);
    }

    #[test]
    fn year_is_skipped_when_row_is_shorter_than_its_column() {
        let html = vendor_table(
            "<th>門市</th><th>備註</th><th>2024年</th><th>2025年</th>",
            "<tr><td>Shop E</td><td>1</td><td>2</td></tr>",
        );

        let result = PartyWorldExtractor.extract_html(&html).expect("extract");

        assert_eq!(result["2024"].len(), 1);
        assert!(result["2025"].is_empty());
    }

    #[test]
    fn rows_without_cells_are_skipped() {
        let html = vendor_table(
            "<th>門市</th><th>2024年</th>",
            "<tr><th>subheading</th></tr><tr><td>Shop F</td><td>6</td></tr>",
        );

        let result = PartyWorldExtractor.extract_html(&html).expect("extract");

        assert_eq!(result["2024"], vec![record("Shop F", &["6"])]);
    }

    #[test]
    fn header_without_year_is_an_error() {
        let html = vendor_table(
            "<th>門市</th><th>一月</th>",
            "<tr><td>Shop G</td><td>1</td></tr>",
        );

        let err = PartyWorldExtractor.extract_html(&html).unwrap_err();

        assert!(
            matches!(err, ScraperError::MissingStructure(ref msg) if msg == YEAR_COLUMN_NOT_FOUND),
            "expected missing year column, got: {err:?}"
        );
    }

    #[test]
    fn page_without_vendor_table_is_an_error() {
        let err = PartyWorldExtractor
            .extract_html("<html><body><p>maintenance</p></body></html>")
            .unwrap_err();

        assert!(
            matches!(err, ScraperError::MissingStructure(ref msg) if msg == TABLE_NOT_FOUND),
            "expected missing table, got: {err:?}"
        );
    }
}
