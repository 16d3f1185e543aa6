//! Command-line argument definitions for the call screening pipeline
//!
//! This module defines the complete CLI interface using the clap derive API.

use crate::config::ScreenConfig;
use crate::error::{Result, ScreenError};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the call screening pipeline
///
/// Screens telephone call records against operator prefix bands and
/// publishes a risk-scored CSV report sorted by call date.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "callscreen",
    version,
    about = "Screen telephone call records against operator prefix bands",
    long_about = "Reads a call records document and an operator prefix document, matches each \
                  caller number against the operator prefix bands it falls inside, assigns a \
                  risk score from the caller's list flags, and publishes a schema-validated \
                  CSV report sorted by call date."
)]
pub struct Args {
    /// Path to the call records JSON document
    ///
    /// Expects a top-level object carrying a `data` array of call records.
    /// If not specified, defaults to data/calls.json.
    #[arg(
        long = "calls",
        value_name = "FILE",
        help = "Path to the call records JSON document"
    )]
    pub calls_path: Option<PathBuf>,

    /// Path to the operator prefix JSON document
    ///
    /// Expects a top-level object carrying a `data` array of prefix records.
    /// If not specified, defaults to data/operators.json.
    #[arg(
        long = "operators",
        value_name = "FILE",
        help = "Path to the operator prefix JSON document"
    )]
    pub operators_path: Option<PathBuf>,

    /// Path of the published CSV report
    ///
    /// The parent directory must already exist; the file itself is replaced
    /// on each run. If not specified, defaults to output.csv.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Path of the published CSV report"
    )]
    pub output_path: Option<PathBuf>,

    /// Output format for the run summary
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for the run summary"
    )]
    pub output_format: OutputFormat,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors and critical messages. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Output format options for the run summary
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
    /// CSV format for data analysis
    Csv,
}

impl Args {
    /// Build the pipeline configuration from the argument set
    pub fn to_config(&self) -> ScreenConfig {
        let mut config = ScreenConfig::default();
        if let Some(path) = &self.calls_path {
            config = config.with_calls_path(path.clone());
        }
        if let Some(path) = &self.operators_path {
            config = config.with_operators_path(path.clone());
        }
        if let Some(path) = &self.output_path {
            config = config.with_output_path(path.clone());
        }
        config
    }

    /// Validate the argument set for consistency
    pub fn validate(&self) -> Result<()> {
        // Input existence is checked by the configuration; here only the
        // output location needs a look.
        if let Some(output_path) = &self.output_path {
            if let Some(parent) = output_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    return Err(ScreenError::configuration(format!(
                        "Output directory does not exist: {}",
                        parent.display()
                    )));
                }
            }
        }

        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }
}

impl Default for Args {
    fn default() -> Self {
        Self {
            calls_path: None,
            operators_path: None,
            output_path: None,
            output_format: OutputFormat::Human,
            verbose: 0,
            quiet: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DEFAULT_CALLS_PATH, DEFAULT_OPERATORS_PATH, DEFAULT_OUTPUT_PATH};
    use tempfile::TempDir;

    #[test]
    fn test_defaults_resolve_to_standard_paths() {
        let config = Args::default().to_config();
        assert_eq!(config.calls_path, PathBuf::from(DEFAULT_CALLS_PATH));
        assert_eq!(config.operators_path, PathBuf::from(DEFAULT_OPERATORS_PATH));
        assert_eq!(config.output_path, PathBuf::from(DEFAULT_OUTPUT_PATH));
    }

    #[test]
    fn test_explicit_paths_override_defaults() {
        let args = Args {
            calls_path: Some(PathBuf::from("inputs/calls.json")),
            operators_path: Some(PathBuf::from("inputs/operators.json")),
            output_path: Some(PathBuf::from("reports/screened.csv")),
            ..Default::default()
        };

        let config = args.to_config();
        assert_eq!(config.calls_path, PathBuf::from("inputs/calls.json"));
        assert_eq!(config.operators_path, PathBuf::from("inputs/operators.json"));
        assert_eq!(config.output_path, PathBuf::from("reports/screened.csv"));
    }

    #[test]
    fn test_output_directory_must_exist() {
        let args = Args {
            output_path: Some(PathBuf::from("/nonexistent/dir/report.csv")),
            ..Default::default()
        };
        assert!(args.validate().is_err());

        // A bare file name in the working directory is fine.
        let args = Args {
            output_path: Some(PathBuf::from("report.csv")),
            ..Default::default()
        };
        assert!(args.validate().is_ok());

        let temp_dir = TempDir::new().unwrap();
        let args = Args {
            output_path: Some(temp_dir.path().join("report.csv")),
            ..Default::default()
        };
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut args = Args::default();

        // Default level
        assert_eq!(args.get_log_level(), "warn");

        // Verbose levels
        args.verbose = 1;
        assert_eq!(args.get_log_level(), "info");

        args.verbose = 2;
        assert_eq!(args.get_log_level(), "debug");

        args.verbose = 3;
        assert_eq!(args.get_log_level(), "trace");

        // Quiet mode
        args.quiet = true;
        assert_eq!(args.get_log_level(), "error");
    }

    #[test]
    fn test_argument_parsing() {
        let args = Args::try_parse_from([
            "callscreen",
            "--calls",
            "a.json",
            "--operators",
            "b.json",
            "-o",
            "out.csv",
            "-vv",
        ])
        .unwrap();

        assert_eq!(args.calls_path, Some(PathBuf::from("a.json")));
        assert_eq!(args.operators_path, Some(PathBuf::from("b.json")));
        assert_eq!(args.output_path, Some(PathBuf::from("out.csv")));
        assert_eq!(args.verbose, 2);

        // Quiet and verbose are mutually exclusive.
        assert!(Args::try_parse_from(["callscreen", "-q", "-v"]).is_err());
    }
}
