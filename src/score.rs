//! Risk score assignment.
//!
//! The published score combines the caller's list flags with the recorded
//! risk score: a number on both lists is trusted, a number only on the red
//! list is flagged outright, and everything else keeps its recorded score
//! rounded to one decimal place. Scores are not clamped here; out-of-range
//! values are caught by output validation.

use polars::prelude::*;
use tracing::debug;

use crate::constants::columns;
use crate::error::{Result, ScreenError};

/// Score a single call record.
///
/// Null flags count as unset. A null risk score stays null unless a list
/// flag decides the outcome first.
pub fn assign_score(green: Option<bool>, red: Option<bool>, risk: Option<f64>) -> Option<f64> {
    let green = green.unwrap_or(false);
    let red = red.unwrap_or(false);

    if green && red {
        Some(0.0)
    } else if red {
        Some(1.0)
    } else {
        risk.map(round_to_tenths)
    }
}

/// Round to one decimal place, resolving exact ties to the even digit
fn round_to_tenths(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}

/// Append the `score` column derived from the flag and risk columns
pub fn score_table(mut frame: DataFrame) -> Result<DataFrame> {
    let green = column_as_flags(frame.column(columns::GREENLIST)?)?;
    let red = column_as_flags(frame.column(columns::REDLIST)?)?;
    let risk = column_as_floats(frame.column(columns::RISKSCORE)?)?;

    let scores: Vec<Option<f64>> = green
        .iter()
        .zip(red.iter())
        .zip(risk.iter())
        .map(|((green, red), risk)| assign_score(*green, *red, *risk))
        .collect();

    debug!("assigned risk scores for {} rows", scores.len());
    frame.with_column(Series::new(columns::SCORE.into(), scores))?;
    Ok(frame)
}

/// Read a list flag column. An all-null column flattens without a boolean
/// dtype, so it is accepted and read as unset flags.
fn column_as_flags(column: &Column) -> Result<Vec<Option<bool>>> {
    match column.dtype() {
        DataType::Boolean => Ok(column.bool()?.into_iter().collect()),
        DataType::String if column.null_count() == column.len() => Ok(vec![None; column.len()]),
        dtype => Err(ScreenError::Polars(PolarsError::ComputeError(
            format!(
                "unsupported dtype {} for flag column '{}'",
                dtype,
                column.name()
            )
            .into(),
        ))),
    }
}

/// Read a risk score column, widening whole-number scores to floats
fn column_as_floats(column: &Column) -> Result<Vec<Option<f64>>> {
    match column.dtype() {
        DataType::Float64 => Ok(column.f64()?.into_iter().collect()),
        DataType::Int64 => Ok(column
            .i64()?
            .into_iter()
            .map(|value| value.map(|v| v as f64))
            .collect()),
        DataType::String if column.null_count() == column.len() => Ok(vec![None; column.len()]),
        dtype => Err(ScreenError::Polars(PolarsError::ComputeError(
            format!(
                "unsupported dtype {} for risk score column '{}'",
                dtype,
                column.name()
            )
            .into(),
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_lists_trump_recorded_score() {
        assert_eq!(assign_score(Some(true), Some(true), Some(5.7)), Some(0.0));
        assert_eq!(assign_score(Some(true), Some(true), None), Some(0.0));
    }

    #[test]
    fn test_red_list_alone_flags_outright() {
        assert_eq!(assign_score(Some(false), Some(true), Some(-3.0)), Some(1.0));
        assert_eq!(assign_score(None, Some(true), None), Some(1.0));
    }

    #[test]
    fn test_green_list_alone_keeps_recorded_score() {
        assert_eq!(assign_score(Some(true), Some(false), Some(0.5)), Some(0.5));
    }

    #[test]
    fn test_unlisted_number_keeps_rounded_score() {
        assert_eq!(assign_score(None, None, Some(0.57)), Some(0.6));
        assert_eq!(assign_score(Some(false), Some(false), Some(0.12)), Some(0.1));
    }

    #[test]
    fn test_null_risk_score_stays_null() {
        assert_eq!(assign_score(None, None, None), None);
        assert_eq!(assign_score(Some(true), Some(false), None), None);
    }

    #[test]
    fn test_out_of_range_scores_are_not_clamped() {
        assert_eq!(assign_score(None, None, Some(7.33)), Some(7.3));
        assert_eq!(assign_score(None, None, Some(-2.46)), Some(-2.5));
    }

    #[test]
    fn test_rounding_resolves_ties_to_even() {
        assert_eq!(round_to_tenths(0.25), 0.2);
        assert_eq!(round_to_tenths(0.75), 0.8);
        assert_eq!(round_to_tenths(0.35), 0.3);
        assert_eq!(round_to_tenths(1.0), 1.0);
    }

    #[test]
    fn test_score_table_appends_column() {
        let frame = df!(
            columns::GREENLIST => &[Some(true), Some(false), None],
            columns::REDLIST => &[Some(true), Some(true), None],
            columns::RISKSCORE => &[Some(0.5), Some(0.2), Some(0.44)],
        )
        .unwrap();

        let scored = score_table(frame).unwrap();
        let score = scored.column(columns::SCORE).unwrap().f64().unwrap();
        assert_eq!(score.get(0), Some(0.0));
        assert_eq!(score.get(1), Some(1.0));
        assert_eq!(score.get(2), Some(0.4));
    }

    #[test]
    fn test_score_table_widens_integer_scores() {
        let frame = df!(
            columns::GREENLIST => &[Some(false)],
            columns::REDLIST => &[Some(false)],
            columns::RISKSCORE => &[1_i64],
        )
        .unwrap();

        let scored = score_table(frame).unwrap();
        let score = scored.column(columns::SCORE).unwrap().f64().unwrap();
        assert_eq!(score.get(0), Some(1.0));
    }

    #[test]
    fn test_score_table_accepts_all_null_flags() {
        let frame = df!(
            columns::GREENLIST => &[None::<&str>],
            columns::REDLIST => &[None::<&str>],
            columns::RISKSCORE => &[Some(0.3)],
        )
        .unwrap();

        let scored = score_table(frame).unwrap();
        let score = scored.column(columns::SCORE).unwrap().f64().unwrap();
        assert_eq!(score.get(0), Some(0.3));
    }
}
