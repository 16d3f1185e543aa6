//! Input document loading and flattening.
//!
//! Both input feeds arrive as a JSON object whose `data` key holds an array
//! of records. Flattening promotes every record key to a top-level column,
//! dot-joining the path for nested maps (`attributes.number`), preserving
//! row order and count, and inferring one dtype per column.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use polars::prelude::*;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Result, ScreenError};

/// A labelled input document, parsed but not yet flattened.
///
/// The label names the feed (`calls`, `operators`) in errors and logs.
#[derive(Debug, Clone)]
pub struct RawTable {
    label: String,
    root: Value,
}

impl RawTable {
    /// Load and parse a document from disk
    pub fn from_path(label: impl Into<String>, path: &Path) -> Result<Self> {
        let label = label.into();
        let text = fs::read_to_string(path)?;
        let root = serde_json::from_str(&text).map_err(|source| ScreenError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        debug!("loaded {} document from {}", label, path.display());
        Ok(Self { label, root })
    }

    /// Parse a document from an in-memory source string
    pub fn from_str(label: impl Into<String>, source: &str) -> Result<Self> {
        let label = label.into();
        let root = serde_json::from_str(source).map_err(|source| ScreenError::Json {
            path: PathBuf::from(format!("<{}>", label)),
            source,
        })?;

        Ok(Self { label, root })
    }

    /// Wrap an already-parsed document
    pub fn from_value(label: impl Into<String>, root: Value) -> Self {
        Self {
            label: label.into(),
            root,
        }
    }

    /// Feed label used in errors and logs
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Number of records in the array under `column`, zero when absent
    pub fn record_count(&self, column: &str) -> usize {
        self.root
            .as_object()
            .and_then(|root| root.get(column))
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }

    /// Flatten the record array under `column` into a tabular frame.
    ///
    /// Fails with [`ScreenError::MissingColumn`] when `column` is absent,
    /// before any transformation. Records with differing key sets are
    /// aligned by name; a key absent from a record yields a null cell.
    pub fn flatten(&self, column: &str) -> Result<DataFrame> {
        let root = self.root.as_object().ok_or_else(|| {
            ScreenError::malformed(&self.label, "document root is not an object")
        })?;

        let records = root.get(column).ok_or_else(|| ScreenError::MissingColumn {
            table: self.label.clone(),
            column: column.to_string(),
        })?;

        let records = records.as_array().ok_or_else(|| {
            ScreenError::malformed(&self.label, format!("'{}' is not a record array", column))
        })?;

        let mut order: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut rows: Vec<HashMap<String, Value>> = Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            let record = record.as_object().ok_or_else(|| {
                ScreenError::malformed(&self.label, format!("record {} is not a mapping", index))
            })?;

            let mut flat = Vec::new();
            flatten_record(record, None, &mut flat);

            let mut row = HashMap::with_capacity(flat.len());
            for (name, value) in flat {
                if seen.insert(name.clone()) {
                    order.push(name.clone());
                }
                row.insert(name, value);
            }
            rows.push(row);
        }

        let columns = order
            .iter()
            .map(|name| {
                let cells: Vec<Option<&Value>> = rows
                    .iter()
                    .map(|row| row.get(name).filter(|value| !value.is_null()))
                    .collect();
                build_column(name, &cells)
            })
            .collect::<Vec<_>>();

        let frame = DataFrame::new(columns)?;
        debug!(
            "flattened {} table: {} rows, {} columns",
            self.label,
            frame.height(),
            frame.width()
        );
        Ok(frame)
    }
}

/// Promote a record's keys to flat column names, dot-joining nested maps
fn flatten_record(record: &Map<String, Value>, prefix: Option<&str>, out: &mut Vec<(String, Value)>) {
    for (key, value) in record {
        let name = match prefix {
            Some(prefix) => format!("{}.{}", prefix, key),
            None => key.clone(),
        };
        match value {
            Value::Object(nested) => flatten_record(nested, Some(&name), out),
            other => out.push((name, other.clone())),
        }
    }
}

/// Build a typed column from one value per row.
///
/// Uniformly typed values keep their JSON type (string, boolean, integer,
/// float); mixed columns fall back to each value's plain string rendering.
fn build_column(name: &str, cells: &[Option<&Value>]) -> Column {
    let mut non_null = 0usize;
    let mut all_strings = true;
    let mut all_bools = true;
    let mut all_numbers = true;
    let mut all_ints = true;

    for value in cells.iter().flatten() {
        non_null += 1;
        match value {
            Value::String(_) => {
                all_bools = false;
                all_numbers = false;
                all_ints = false;
            }
            Value::Bool(_) => {
                all_strings = false;
                all_numbers = false;
                all_ints = false;
            }
            Value::Number(number) => {
                all_strings = false;
                all_bools = false;
                if number.as_i64().is_none() {
                    all_ints = false;
                }
            }
            _ => {
                all_strings = false;
                all_bools = false;
                all_numbers = false;
                all_ints = false;
            }
        }
    }

    let series = if non_null == 0 || all_strings {
        let values: Vec<Option<String>> = cells
            .iter()
            .map(|cell| cell.and_then(Value::as_str).map(str::to_string))
            .collect();
        Series::new(name.into(), values)
    } else if all_bools {
        let values: Vec<Option<bool>> = cells
            .iter()
            .map(|cell| cell.and_then(Value::as_bool))
            .collect();
        Series::new(name.into(), values)
    } else if all_ints {
        let values: Vec<Option<i64>> = cells
            .iter()
            .map(|cell| cell.and_then(Value::as_i64))
            .collect();
        Series::new(name.into(), values)
    } else if all_numbers {
        let values: Vec<Option<f64>> = cells
            .iter()
            .map(|cell| cell.and_then(Value::as_f64))
            .collect();
        Series::new(name.into(), values)
    } else {
        let values: Vec<Option<String>> = cells
            .iter()
            .map(|cell| cell.map(|value| render_value(value)))
            .collect();
        Series::new(name.into(), values)
    };

    series.into_column()
}

/// Plain string rendering of a JSON value (strings unquoted)
fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Render every cell of a column as text, keeping nulls.
///
/// Used wherever a downstream stage consumes a column value-wise regardless
/// of its inferred dtype (number normalization, prefix parsing).
pub fn column_as_strings(column: &Column) -> Result<Vec<Option<String>>> {
    let rendered = match column.dtype() {
        DataType::String => column
            .str()?
            .into_iter()
            .map(|value| value.map(str::to_string))
            .collect(),
        DataType::Int64 => column
            .i64()?
            .into_iter()
            .map(|value| value.map(|v| v.to_string()))
            .collect(),
        DataType::Float64 => column
            .f64()?
            .into_iter()
            .map(|value| value.map(|v| v.to_string()))
            .collect(),
        DataType::Boolean => column
            .bool()?
            .into_iter()
            .map(|value| value.map(|v| v.to_string()))
            .collect(),
        dtype => {
            return Err(ScreenError::Polars(PolarsError::ComputeError(
                format!(
                    "unsupported dtype {} for text rendering of column '{}'",
                    dtype,
                    column.name()
                )
                .into(),
            )));
        }
    };
    Ok(rendered)
}
