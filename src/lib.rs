//! Call Screening Pipeline Library
//!
//! A Rust library for screening telephone call records against operator
//! prefix bands and publishing a risk-scored CSV report.
//!
//! This library provides tools for:
//! - Flattening nested JSON record documents into typed tabular frames
//! - Normalizing caller numbers into a dashed form with a numeric join key
//! - Matching numbers to operator prefix bands with an exclusive range join
//! - Deriving a risk score from caller list flags and the recorded score
//! - Validating the published table against a declared output schema
//! - Writing a deterministic CSV report sorted by call date

pub mod config;
pub mod constants;
pub mod error;
pub mod ingest;
pub mod join;
pub mod models;
pub mod phone;
pub mod pipeline;
pub mod schema;
pub mod score;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use config::ScreenConfig;
pub use error::{Result, ScreenError};
pub use ingest::RawTable;
pub use models::{ScreenStats, TableKind};
pub use pipeline::ScreeningPipeline;
