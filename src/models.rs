//! Core data structures and types for call screening.
//!
//! Defines the closed set of publishable table kinds and the statistics
//! object returned by a pipeline run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::OUTPUT_COLUMNS;

/// Output tables the pipeline can publish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableKind {
    ScreenedCalls,
}

impl TableKind {
    /// Table name used in reports and validation errors
    pub fn name(&self) -> &'static str {
        match self {
            TableKind::ScreenedCalls => "screened_calls",
        }
    }

    /// Published column count for this table kind
    pub fn expected_columns(&self) -> usize {
        match self {
            TableKind::ScreenedCalls => OUTPUT_COLUMNS.len(),
        }
    }
}

/// Publication statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScreenStats {
    pub calls_read: usize,
    pub operators_read: usize,
    pub calls_matched: usize,
    pub rows_published: usize,
    pub output_path: PathBuf,
    pub processing_time_ms: u64,
}
