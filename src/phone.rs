//! Phone number normalization.
//!
//! Turns the raw caller number into a dashed display form and derives the
//! numeric join key used by the range join. Both transforms are pure and
//! total: missing numbers become `Withheld`, unextractable keys `Unknown`.

use polars::prelude::*;
use tracing::debug;

use crate::constants::{UNKNOWN_KEY, WITHHELD_NUMBER, numeric_key_column};
use crate::error::Result;
use crate::ingest::column_as_strings;

/// Render a raw number in dashed display form.
///
/// A null/absent value becomes `Withheld`. Otherwise the text splits into
/// its first 3 characters, next 4, and remainder, joined with `-`. Shorter
/// inputs yield shorter or empty segments; splitting never fails.
pub fn dashed_number(raw: Option<&str>) -> String {
    let Some(number) = raw else {
        return WITHHELD_NUMBER.to_string();
    };

    let chars: Vec<char> = number.chars().collect();
    let first: String = chars.iter().take(3).collect();
    let middle: String = chars.iter().skip(3).take(4).collect();
    let rest: String = chars.iter().skip(7).collect();
    format!("{}-{}-{}", first, middle, rest)
}

/// Extract the numeric join key from a dashed number.
///
/// The segment at index 1 after splitting on `-`, parsed as a float and
/// canonically rendered so the join can re-parse it losslessly. Any
/// failure, including the `Withheld` placeholder, yields `Unknown`.
pub fn numeric_key(dashed: &str) -> String {
    let Some(middle) = dashed.split('-').nth(1) else {
        return UNKNOWN_KEY.to_string();
    };

    match middle.trim().parse::<f64>() {
        Ok(value) => value.to_string(),
        Err(_) => UNKNOWN_KEY.to_string(),
    }
}

/// Replace `column` with its dashed form and add the numeric key column.
///
/// Row order and count are preserved; the key column is named
/// `<column>.numeric`.
pub fn normalize_numbers(frame: DataFrame, column: &str) -> Result<DataFrame> {
    let raw = column_as_strings(frame.column(column)?)?;

    let dashed: Vec<String> = raw
        .iter()
        .map(|value| dashed_number(value.as_deref()))
        .collect();
    let keys: Vec<String> = dashed.iter().map(|value| numeric_key(value)).collect();

    let withheld = dashed
        .iter()
        .filter(|value| value.as_str() == WITHHELD_NUMBER)
        .count();

    let mut frame = frame;
    frame.with_column(Series::new(column.into(), dashed))?;
    frame.with_column(Series::new(numeric_key_column(column).into(), keys))?;

    debug!(
        "normalized {} numbers in '{}' ({} withheld)",
        frame.height(),
        column,
        withheld
    );
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashed_number_splits_three_four_rest() {
        assert_eq!(dashed_number(Some("+441234567890")), "+44-1234-567890");
        assert_eq!(dashed_number(Some("441234567890")), "441-2345-67890");
    }

    #[test]
    fn test_dashed_number_has_exactly_two_dashes() {
        let dashed = dashed_number(Some("+441234567890"));
        assert_eq!(dashed.matches('-').count(), 2);

        // Re-splitting recovers the character groups.
        let segments: Vec<&str> = dashed.split('-').collect();
        assert_eq!(segments, vec!["+44", "1234", "567890"]);
    }

    #[test]
    fn test_dashed_number_short_inputs() {
        assert_eq!(dashed_number(Some("ab")), "ab--");
        assert_eq!(dashed_number(Some("abcde")), "abc-de-");
        assert_eq!(dashed_number(Some("")), "--");
    }

    #[test]
    fn test_dashed_number_withheld_on_missing() {
        assert_eq!(dashed_number(None), "Withheld");
    }

    #[test]
    fn test_numeric_key_parses_middle_segment() {
        assert_eq!(numeric_key("+44-1234-567890"), "1234");
        assert_eq!(numeric_key("441-2345-67890"), "2345");
    }

    #[test]
    fn test_numeric_key_canonicalizes_leading_zeros() {
        assert_eq!(numeric_key("+44-0234-567890"), "234");
    }

    #[test]
    fn test_numeric_key_unknown_on_withheld() {
        // No dash, so there is no middle segment to parse.
        assert_eq!(numeric_key("Withheld"), "Unknown");
    }

    #[test]
    fn test_numeric_key_unknown_on_unparseable_segment() {
        assert_eq!(numeric_key("abc-defg-hij"), "Unknown");
        assert_eq!(numeric_key("ab--"), "Unknown");
    }

    #[test]
    fn test_normalize_numbers_replaces_and_extends() {
        let frame = df!(
            "attributes.number" => &[Some("+441234567890"), None],
            "id" => &[Some("a"), Some("b")],
        )
        .unwrap();

        let frame = normalize_numbers(frame, "attributes.number").unwrap();

        let numbers = frame.column("attributes.number").unwrap().str().unwrap();
        assert_eq!(numbers.get(0), Some("+44-1234-567890"));
        assert_eq!(numbers.get(1), Some("Withheld"));

        let keys = frame
            .column("attributes.number.numeric")
            .unwrap()
            .str()
            .unwrap();
        assert_eq!(keys.get(0), Some("1234"));
        assert_eq!(keys.get(1), Some("Unknown"));
    }

    #[test]
    fn test_normalize_numbers_handles_numeric_input_column() {
        // A bare-numeric feed renders without the plus sign.
        let frame = df!("attributes.number" => &[441234567890_i64]).unwrap();
        let frame = normalize_numbers(frame, "attributes.number").unwrap();

        let numbers = frame.column("attributes.number").unwrap().str().unwrap();
        assert_eq!(numbers.get(0), Some("441-2345-67890"));

        let keys = frame
            .column("attributes.number.numeric")
            .unwrap()
            .str()
            .unwrap();
        assert_eq!(keys.get(0), Some("2345"));
    }
}
