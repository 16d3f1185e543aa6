//! Prefix range join.
//!
//! Pairs every call row with every operator row and keeps the pairs whose
//! numeric key falls strictly inside the operator's prefix band. A value
//! that does not parse as a float on either side is a silent non-match,
//! never an error.

use polars::prelude::*;
use tracing::debug;

use crate::constants::{PREFIX_BAND_SPAN, suffixed_column};
use crate::error::Result;
use crate::ingest::column_as_strings;

/// Parse a rendered cell for the band test
fn parse_band_value(value: Option<&str>) -> Option<f64> {
    value.and_then(|text| text.trim().parse::<f64>().ok())
}

/// True when `key` falls strictly inside `(prefix, prefix + PREFIX_BAND_SPAN)`
fn in_band(key: f64, prefix: f64) -> bool {
    key > prefix && key < prefix + PREFIX_BAND_SPAN
}

/// Cross-join calls against operators, keeping in-band pairs.
///
/// A call matching several operators yields one row per match; a call
/// matching none disappears. Right-side columns whose names collide with
/// left-side ones are suffixed `_right`.
pub fn range_join(
    calls: &DataFrame,
    operators: &DataFrame,
    key_column: &str,
    prefix_column: &str,
) -> Result<DataFrame> {
    if calls.height() == 0 || operators.height() == 0 {
        return stack_sides(calls.clear(), operators.clear());
    }

    let keys: Vec<Option<f64>> = column_as_strings(calls.column(key_column)?)?
        .iter()
        .map(|value| parse_band_value(value.as_deref()))
        .collect();
    let prefixes: Vec<Option<f64>> = column_as_strings(operators.column(prefix_column)?)?
        .iter()
        .map(|value| parse_band_value(value.as_deref()))
        .collect();

    let mut left_rows: Vec<IdxSize> = Vec::new();
    let mut right_rows: Vec<IdxSize> = Vec::new();

    for (left, key) in keys.iter().enumerate() {
        for (right, prefix) in prefixes.iter().enumerate() {
            if let (Some(key), Some(prefix)) = (key, prefix) {
                if in_band(*key, *prefix) {
                    left_rows.push(left as IdxSize);
                    right_rows.push(right as IdxSize);
                }
            }
        }
    }

    debug!(
        "range join kept {} of {} candidate pairs",
        left_rows.len(),
        keys.len() * prefixes.len()
    );

    let left = calls.take(&IdxCa::from_vec("idx".into(), left_rows))?;
    let right = operators.take(&IdxCa::from_vec("idx".into(), right_rows))?;
    stack_sides(left, right)
}

/// Combine the gathered sides, suffixing right columns on name collision
fn stack_sides(left: DataFrame, mut right: DataFrame) -> Result<DataFrame> {
    let left_names: Vec<String> = left
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect();
    let right_names: Vec<String> = right
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect();

    for name in &right_names {
        if left_names.contains(name) {
            right.rename(name.as_str(), suffixed_column(name).into())?;
        }
    }

    Ok(left.hstack(right.get_columns())?)
}
