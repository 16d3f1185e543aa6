//! Output schema validation.
//!
//! The published table is checked against a named schema before anything is
//! written: column presence, dtype, nullability, and per-cell value checks.
//! Validation collects every violating (column, row) pair instead of
//! stopping at the first, so one failed run reports the full defect list.

use std::fmt;

use polars::prelude::*;
use regex::Regex;
use tracing::debug;

use crate::constants::{
    ID_LENGTH, ID_PATTERN, NUMBER_COUNTRY_PREFIX, SCORE_MAX, SCORE_MIN, WITHHELD_NUMBER, columns,
};
use crate::error::{Result, ScreenError};
use crate::models::TableKind;

/// One failed check, pinned to a column and (for cell checks) a row
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub column: String,
    pub row: Option<usize>,
    pub check: String,
    pub value: String,
}

impl Violation {
    fn table_level(column: &str, check: impl Into<String>) -> Self {
        Self {
            column: column.to_string(),
            row: None,
            check: check.into(),
            value: String::new(),
        }
    }

    fn cell(column: &str, row: usize, check: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.to_string(),
            row: Some(row),
            check: check.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row {
            Some(row) => write!(
                f,
                "column '{}', row {}: {} (got '{}')",
                self.column, row, self.check, self.value
            ),
            None => write!(f, "column '{}': {}", self.column, self.check),
        }
    }
}

/// Render a violation list for error display, one indented line each
pub fn render_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|violation| format!("  - {}", violation))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A single value check applied to every non-null cell of a column
#[derive(Debug, Clone)]
enum Check {
    /// Exact character count
    Length(usize),
    /// Minimum character count
    MinLength(usize),
    /// Full-string regular expression match
    Pattern(Regex),
    /// Starts with a prefix, or equals a placeholder literal
    PrefixOrLiteral { prefix: String, literal: String },
    /// Inclusive numeric bounds
    Range { min: f64, max: f64 },
}

impl Check {
    fn pattern(pattern: &str) -> Self {
        // The pattern is a compile-time constant; a bad one is a programming
        // error, not a runtime condition.
        Check::Pattern(Regex::new(pattern).expect("valid column pattern"))
    }

    fn passes_text(&self, value: &str) -> bool {
        match self {
            Check::Length(expected) => value.chars().count() == *expected,
            Check::MinLength(minimum) => value.chars().count() >= *minimum,
            Check::Pattern(pattern) => pattern.is_match(value),
            Check::PrefixOrLiteral { prefix, literal } => {
                value.starts_with(prefix.as_str()) || value == literal
            }
            Check::Range { .. } => true,
        }
    }

    fn passes_float(&self, value: f64) -> bool {
        match self {
            Check::Range { min, max } => value >= *min && value <= *max,
            _ => true,
        }
    }

    fn describe(&self) -> String {
        match self {
            Check::Length(expected) => format!("length must be exactly {}", expected),
            Check::MinLength(minimum) => format!("length must be at least {}", minimum),
            Check::Pattern(pattern) => format!("value must match pattern {}", pattern.as_str()),
            Check::PrefixOrLiteral { prefix, literal } => {
                format!("value must start with '{}' or equal '{}'", prefix, literal)
            }
            Check::Range { min, max } => format!("value must lie within [{}, {}]", min, max),
        }
    }
}

/// Requirements for one output column
#[derive(Debug, Clone)]
struct ColumnRule {
    name: &'static str,
    dtype: DataType,
    nullable: bool,
    checks: Vec<Check>,
}

impl ColumnRule {
    fn new(name: &'static str, dtype: DataType) -> Self {
        Self {
            name,
            dtype,
            nullable: false,
            checks: Vec::new(),
        }
    }

    fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    fn with_check(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }
}

/// An immutable, named schema for a publishable table
#[derive(Debug, Clone)]
pub struct TableSchema {
    name: String,
    columns: Vec<ColumnRule>,
}

impl TableSchema {
    /// Check `frame` against the schema, collecting every violation.
    ///
    /// Returns [`ScreenError::SchemaValidation`] carrying the complete
    /// violation list when any check fails.
    pub fn validate(&self, frame: &DataFrame) -> Result<()> {
        let mut violations = Vec::new();

        for rule in &self.columns {
            match frame.column(rule.name) {
                Ok(column) => validate_column(rule, column, &mut violations)?,
                Err(_) => violations.push(Violation::table_level(rule.name, "column is missing")),
            }
        }

        if violations.is_empty() {
            debug!(
                "{} table passed schema validation ({} rows)",
                self.name,
                frame.height()
            );
            Ok(())
        } else {
            Err(ScreenError::SchemaValidation {
                table: self.name.clone(),
                violations,
            })
        }
    }
}

fn validate_column(
    rule: &ColumnRule,
    column: &Column,
    violations: &mut Vec<Violation>,
) -> Result<()> {
    if column.dtype() != &rule.dtype {
        violations.push(Violation::table_level(
            rule.name,
            format!("expected dtype {}, found {}", rule.dtype, column.dtype()),
        ));
        return Ok(());
    }

    match rule.dtype {
        DataType::String => {
            for (row, value) in column.str()?.into_iter().enumerate() {
                match value {
                    None if !rule.nullable => violations.push(Violation::cell(
                        rule.name,
                        row,
                        "null value in non-nullable column",
                        "null",
                    )),
                    None => {}
                    Some(value) => {
                        for check in &rule.checks {
                            if !check.passes_text(value) {
                                violations.push(Violation::cell(
                                    rule.name,
                                    row,
                                    check.describe(),
                                    value,
                                ));
                            }
                        }
                    }
                }
            }
        }
        DataType::Float64 => {
            for (row, value) in column.f64()?.into_iter().enumerate() {
                match value {
                    None if !rule.nullable => violations.push(Violation::cell(
                        rule.name,
                        row,
                        "null value in non-nullable column",
                        "null",
                    )),
                    None => {}
                    Some(value) => {
                        for check in &rule.checks {
                            if !check.passes_float(value) {
                                violations.push(Violation::cell(
                                    rule.name,
                                    row,
                                    check.describe(),
                                    value.to_string(),
                                ));
                            }
                        }
                    }
                }
            }
        }
        _ => {
            // Date and any other dtype carry no value checks, only nullability.
            if !rule.nullable {
                let nulls = column.as_materialized_series().is_null();
                for (row, is_null) in (&nulls).into_iter().enumerate() {
                    if is_null == Some(true) {
                        violations.push(Violation::cell(
                            rule.name,
                            row,
                            "null value in non-nullable column",
                            "null",
                        ));
                    }
                }
            }
        }
    }

    Ok(())
}

/// Schema of the published screened-calls report
fn screened_calls_schema() -> TableSchema {
    TableSchema {
        name: TableKind::ScreenedCalls.name().to_string(),
        columns: vec![
            ColumnRule::new(columns::ID, DataType::String)
                .with_check(Check::Length(ID_LENGTH))
                .with_check(Check::pattern(ID_PATTERN)),
            ColumnRule::new(columns::DATE, DataType::Date),
            ColumnRule::new(columns::OPERATOR, DataType::String).with_check(Check::MinLength(1)),
            ColumnRule::new(columns::NUMBER, DataType::String)
                .nullable()
                .with_check(Check::PrefixOrLiteral {
                    prefix: NUMBER_COUNTRY_PREFIX.to_string(),
                    literal: WITHHELD_NUMBER.to_string(),
                }),
            ColumnRule::new(columns::SCORE, DataType::Float64).with_check(Check::Range {
                min: SCORE_MIN,
                max: SCORE_MAX,
            }),
        ],
    }
}

impl TableKind {
    /// Schema definition for this table kind
    pub fn schema(&self) -> TableSchema {
        match self {
            TableKind::ScreenedCalls => screened_calls_schema(),
        }
    }
}
