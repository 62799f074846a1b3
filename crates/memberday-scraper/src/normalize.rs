//! Normalization of free-form member-day cell text into canonical date tokens.
//!
//! Source tables separate days with `、` but frequently run several
//! two-digit days together (`"0105"` for the 1st and 5th). Segments longer
//! than two characters are re-split into two-character chunks.

/// Delimiter used by the source tables between day entries.
pub const DATE_DELIMITER: &str = "、";

/// Months in a calendar row. Extra cells beyond this are ignored.
pub const MONTHS_PER_YEAR: usize = 12;

const TOKEN_WIDTH: usize = 2;

/// Splits raw cell text into ordered day tokens of at most two characters.
///
/// Lengths are counted in characters, not bytes. An empty input yields an
/// empty list; empty segments between adjacent delimiters are kept as empty
/// tokens.
#[must_use]
pub fn normalize_dates(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }

    let mut tokens = Vec::new();
    for segment in raw.split(DATE_DELIMITER) {
        let chars: Vec<char> = segment.chars().collect();
        if chars.len() <= TOKEN_WIDTH {
            tokens.push(segment.to_owned());
        } else {
            tokens.extend(chars.chunks(TOKEN_WIDTH).map(|chunk| chunk.iter().collect()));
        }
    }
    tokens
}

/// Normalizes up to twelve monthly cells, re-joining each month's tokens
/// with [`DATE_DELIMITER`].
///
/// The output has `min(12, raw_months.len())` entries; short rows are not
/// padded.
#[must_use]
pub fn aggregate_months<S: AsRef<str>>(raw_months: &[S]) -> Vec<String> {
    raw_months
        .iter()
        .take(MONTHS_PER_YEAR)
        .map(|raw| normalize_dates(raw.as_ref()).join(DATE_DELIMITER))
        .collect()
}
