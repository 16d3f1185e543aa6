//! Pipeline orchestration.
//!
//! Runs the screening stages in order: flatten both documents, normalize
//! caller numbers, match numbers to operator prefix bands, derive calendar
//! dates and risk scores, then validate and publish the report.

use std::collections::HashSet;
use std::fs::File;
use std::path::Path;
use std::time::Instant;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use tracing::{debug, info};

use crate::constants::{
    CALLS_TABLE, CSV_FLOAT_PRECISION, DATA_COLUMN, DATE_FORMAT, DATETIME_FORMATS, OPERATORS_TABLE,
    OUTPUT_COLUMNS, WORKING_SELECTION, columns, numeric_key_column,
};
use crate::error::Result;
use crate::ingest::{RawTable, column_as_strings};
use crate::join::range_join;
use crate::models::{ScreenStats, TableKind};
use crate::phone::normalize_numbers;
use crate::score::score_table;

/// The call screening pipeline over two input documents.
///
/// Construct it either from filesystem paths or from already-parsed raw
/// tables; the latter keeps transformation tests free of file fixtures.
#[derive(Debug)]
pub struct ScreeningPipeline {
    calls: RawTable,
    operators: RawTable,
}

impl ScreeningPipeline {
    /// Load both input documents from disk
    pub fn from_paths(calls_path: &Path, operators_path: &Path) -> Result<Self> {
        Ok(Self {
            calls: RawTable::from_path(CALLS_TABLE, calls_path)?,
            operators: RawTable::from_path(OPERATORS_TABLE, operators_path)?,
        })
    }

    /// Build the pipeline over already-parsed documents
    pub fn from_tables(calls: RawTable, operators: RawTable) -> Self {
        Self { calls, operators }
    }

    /// Run every transformation stage, producing the publishable frame.
    ///
    /// The result is sorted by date (ties keep their pre-sort order) but
    /// not yet validated against the output schema.
    pub fn transform(&self) -> Result<DataFrame> {
        let calls = self.calls.flatten(DATA_COLUMN)?;
        let operators = self.operators.flatten(DATA_COLUMN)?;
        info!(
            "screening {} call records against {} operator prefixes",
            calls.height(),
            operators.height()
        );

        let calls = normalize_numbers(calls, columns::RAW_NUMBER)?;
        let joined = range_join(
            &calls,
            &operators,
            &numeric_key_column(columns::RAW_NUMBER),
            columns::PREFIX,
        )?;
        debug!("{} rows after prefix matching", joined.height());

        let mut working = joined.select(WORKING_SELECTION.iter().map(|(old, _)| *old))?;
        for &(old, new) in WORKING_SELECTION {
            if old != new {
                working.rename(old, new.into())?;
            }
        }

        let working = to_calendar_dates(working)?;
        let scored = score_table(working)?;

        let report = scored.select(OUTPUT_COLUMNS.iter().copied())?;
        let report = report.sort(
            [columns::DATE],
            SortMultipleOptions::default().with_maintain_order(true),
        )?;
        Ok(report)
    }

    /// Transform, validate, and write the report to `output_path`.
    ///
    /// The output schema is checked before the file is created; a failed
    /// validation leaves no output behind, not even a partial one.
    pub fn publish(&self, output_path: &Path) -> Result<ScreenStats> {
        let started = Instant::now();

        let mut report = self.transform()?;
        TableKind::ScreenedCalls.schema().validate(&report)?;

        let calls_matched = report
            .column(columns::ID)?
            .str()?
            .into_iter()
            .flatten()
            .collect::<HashSet<_>>()
            .len();

        let mut file = File::create(output_path)?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .with_float_precision(Some(CSV_FLOAT_PRECISION))
            .finish(&mut report)?;

        let stats = ScreenStats {
            calls_read: self.calls.record_count(DATA_COLUMN),
            operators_read: self.operators.record_count(DATA_COLUMN),
            calls_matched,
            rows_published: report.height(),
            output_path: output_path.to_path_buf(),
            processing_time_ms: started.elapsed().as_millis() as u64,
        };

        info!(
            "published {} rows to {}",
            stats.rows_published,
            output_path.display()
        );
        Ok(stats)
    }
}

/// Replace the string date column with a calendar date column.
///
/// Cells that fit none of the accepted formats become null for the output
/// validator to catch.
fn to_calendar_dates(mut frame: DataFrame) -> Result<DataFrame> {
    let rendered = column_as_strings(frame.column(columns::DATE)?)?;

    // NaiveDate::default() is the Unix epoch.
    let epoch = NaiveDate::default();
    let days: Vec<Option<i32>> = rendered
        .iter()
        .map(|value| {
            value
                .as_deref()
                .and_then(parse_calendar_date)
                .map(|date| (date - epoch).num_days() as i32)
        })
        .collect();

    let dates = Series::new(columns::DATE.into(), days).cast(&DataType::Date)?;
    frame.with_column(dates)?;
    Ok(frame)
}

/// Parse one date cell, discarding any time-of-day
fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return Some(date);
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Some(datetime.date());
        }
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|datetime| datetime.date_naive())
}
