//! Configuration management and validation.
//!
//! Provides the configuration structure for a screening run: where the two
//! input documents live and where the published report is written.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{DEFAULT_CALLS_PATH, DEFAULT_OPERATORS_PATH, DEFAULT_OUTPUT_PATH};
use crate::error::{Result, ScreenError};

/// Global configuration for a screening run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenConfig {
    /// Location of the call records document
    pub calls_path: PathBuf,

    /// Location of the operator prefix document
    pub operators_path: PathBuf,

    /// Location of the published CSV report
    pub output_path: PathBuf,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            calls_path: PathBuf::from(DEFAULT_CALLS_PATH),
            operators_path: PathBuf::from(DEFAULT_OPERATORS_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

impl ScreenConfig {
    /// Create configuration with a custom call records path
    pub fn with_calls_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.calls_path = path.into();
        self
    }

    /// Create configuration with a custom operator prefix path
    pub fn with_operators_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.operators_path = path.into();
        self
    }

    /// Create configuration with a custom report path
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Check that both input documents exist and the output path is usable
    pub fn validate(&self) -> Result<()> {
        for (label, path) in [
            ("calls", &self.calls_path),
            ("operators", &self.operators_path),
        ] {
            if !path.exists() {
                return Err(ScreenError::configuration(format!(
                    "{} document not found: {}",
                    label,
                    path.display()
                )));
            }
        }

        if self.output_path.as_os_str().is_empty() {
            return Err(ScreenError::configuration("output path must not be empty"));
        }

        Ok(())
    }
}
