//! Application constants for the call screening pipeline
//!
//! This module contains the fixed paths, column names, placeholder values,
//! and validation bounds used throughout the pipeline.

// =============================================================================
// Default Paths
// =============================================================================

/// Default location of the call records document
pub const DEFAULT_CALLS_PATH: &str = "data/calls.json";

/// Default location of the operator prefix document
pub const DEFAULT_OPERATORS_PATH: &str = "data/operators.json";

/// Default location of the published report
pub const DEFAULT_OUTPUT_PATH: &str = "output.csv";

// =============================================================================
// Input Document Structure
// =============================================================================

/// Top-level column holding the nested record array in both input documents
pub const DATA_COLUMN: &str = "data";

/// Table label for the call records document, used in error context
pub const CALLS_TABLE: &str = "calls";

/// Table label for the operator prefix document, used in error context
pub const OPERATORS_TABLE: &str = "operators";

// =============================================================================
// Normalization Placeholders
// =============================================================================

/// Filled value for a null or absent caller number
pub const WITHHELD_NUMBER: &str = "Withheld";

/// Filled value for a numeric join key that could not be extracted
pub const UNKNOWN_KEY: &str = "Unknown";

/// Suffix appended to a number column's name for its numeric key column
pub const NUMERIC_KEY_SUFFIX: &str = ".numeric";

// =============================================================================
// Range Join Configuration
// =============================================================================

/// Width of an operator's exclusive prefix band: keys strictly between
/// `prefix` and `prefix + PREFIX_BAND_SPAN` belong to the operator
pub const PREFIX_BAND_SPAN: f64 = 999.0;

/// Suffix applied to right-side columns that collide with a left-side name
pub const JOIN_SUFFIX: &str = "_right";

// =============================================================================
// Column Name Constants
// =============================================================================

/// Column names used across the pipeline stages
pub mod columns {
    // Flattened call record columns
    pub const ID: &str = "id";
    pub const RAW_NUMBER: &str = "attributes.number";
    pub const RAW_OPERATOR: &str = "attributes.operator";
    pub const RAW_DATE: &str = "attributes.date";
    pub const RAW_GREEN_LIST: &str = "attributes.greenList";
    pub const RAW_RED_LIST: &str = "attributes.redList";
    pub const RAW_RISK_SCORE: &str = "attributes.riskScore";

    // Flattened operator record columns
    pub const PREFIX: &str = "prefix";

    // Working columns after the post-join rename
    pub const NUMBER: &str = "number";
    pub const OPERATOR: &str = "operator";
    pub const DATE: &str = "date";
    pub const GREENLIST: &str = "greenlist";
    pub const REDLIST: &str = "redlist";
    pub const RISKSCORE: &str = "riskscore";

    // Derived output column
    pub const SCORE: &str = "score";
}

/// Post-join selection and rename pairs, in working order
pub const WORKING_SELECTION: &[(&str, &str)] = &[
    (columns::ID, columns::ID),
    (columns::RAW_NUMBER, columns::NUMBER),
    (columns::RAW_OPERATOR, columns::OPERATOR),
    (columns::RAW_DATE, columns::DATE),
    (columns::RAW_GREEN_LIST, columns::GREENLIST),
    (columns::RAW_RED_LIST, columns::REDLIST),
    (columns::RAW_RISK_SCORE, columns::RISKSCORE),
];

/// Published column order of the screened calls report
pub const OUTPUT_COLUMNS: &[&str] = &[
    columns::ID,
    columns::DATE,
    columns::OPERATOR,
    columns::NUMBER,
    columns::SCORE,
];

// =============================================================================
// Validation Bounds
// =============================================================================

/// Required length of a call record identifier
pub const ID_LENGTH: usize = 36;

/// Allowed character set of a call record identifier
pub const ID_PATTERN: &str = r"^[a-f0-9\-]+$";

/// Country prefix a published number must carry unless withheld
pub const NUMBER_COUNTRY_PREFIX: &str = "+44";

/// Inclusive score bounds of the published report
pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 1.0;

// =============================================================================
// Date and Output Formatting
// =============================================================================

/// Calendar date format used for parsing and publication
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Datetime input formats accepted before the time-of-day is stripped
pub const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Decimal places used when serializing float columns to CSV
pub const CSV_FLOAT_PRECISION: usize = 1;

// =============================================================================
// Helper Functions
// =============================================================================

/// Name of the numeric key column derived from a number column
pub fn numeric_key_column(number_column: &str) -> String {
    format!("{}{}", number_column, NUMERIC_KEY_SUFFIX)
}

/// Name given to a right-side join column that collides with a left-side name
pub fn suffixed_column(column: &str) -> String {
    format!("{}{}", column, JOIN_SUFFIX)
}
