//! Error handling for call screening operations.
//!
//! Provides error types with context for document loading, flattening,
//! and output schema validation failures.

use std::path::PathBuf;
use thiserror::Error;

use crate::schema::{Violation, render_violations};

#[derive(Error, Debug)]
pub enum ScreenError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Invalid JSON in document: {} - {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Required column '{column}' missing from {table} table")]
    MissingColumn { table: String, column: String },

    #[error("Malformed {table} table: {reason}")]
    Malformed { table: String, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error(
        "Schema validation failed for {table} with {} violation(s):\n{}",
        .violations.len(),
        render_violations(.violations)
    )]
    SchemaValidation {
        table: String,
        violations: Vec<Violation>,
    },
}

impl ScreenError {
    pub fn configuration(message: impl Into<String>) -> Self {
        ScreenError::Configuration {
            message: message.into(),
        }
    }

    pub fn malformed(table: impl Into<String>, reason: impl Into<String>) -> Self {
        ScreenError::Malformed {
            table: table.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScreenError>;
