//! Command execution for the call screening CLI
//!
//! Wires the parsed arguments into the pipeline: logging setup, argument and
//! configuration validation, the screening run itself, and the final run
//! summary in the requested output format.

use crate::cli::args::{Args, OutputFormat};
use crate::error::Result;
use crate::models::ScreenStats;
use crate::pipeline::ScreeningPipeline;
use colored::*;
use tracing::{debug, info};

/// Main command runner for the call screening pipeline
///
/// This function orchestrates the entire screening workflow:
/// 1. Set up logging and validate arguments
/// 2. Resolve the input and output paths
/// 3. Run the pipeline and publish the report
/// 4. Generate summary statistics
pub fn run(args: Args) -> Result<ScreenStats> {
    setup_logging(&args)?;

    info!("Starting call screening");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;
    let config = args.to_config();
    config.validate()?;

    if !args.quiet {
        println!(
            "{} {} {} {}",
            "Screening".bright_green().bold(),
            config.calls_path.display().to_string().bright_cyan(),
            "against".bright_white(),
            config.operators_path.display().to_string().bright_cyan()
        );
    }

    let pipeline = ScreeningPipeline::from_paths(&config.calls_path, &config.operators_path)?;
    let stats = pipeline.publish(&config.output_path)?;

    generate_final_report(&args, &stats)?;
    Ok(stats)
}

/// Set up structured logging based on CLI arguments
fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    // Create filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("callscreen={}", log_level)));

    if args.quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        // Standard logging with timestamps
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Generate final screening report
fn generate_final_report(args: &Args, stats: &ScreenStats) -> Result<()> {
    info!("Generating final report");

    match args.output_format {
        OutputFormat::Human => generate_human_report(stats),
        OutputFormat::Json => generate_json_report(stats),
        OutputFormat::Csv => generate_csv_report(stats),
    }
}

/// Generate human-readable report
fn generate_human_report(stats: &ScreenStats) -> Result<()> {
    println!("\n🎉 Call Screening Complete!");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📊 Screening Summary:");
    println!("   • Call records read: {}", stats.calls_read);
    println!("   • Operator prefixes read: {}", stats.operators_read);
    println!("   • Calls matched to a band: {}", stats.calls_matched);
    println!("   • Rows published: {}", stats.rows_published);
    println!("   • Report written to: {}", stats.output_path.display());
    println!("   • Processing time: {} ms", stats.processing_time_ms);

    let unmatched = stats.calls_read.saturating_sub(stats.calls_matched);
    if unmatched > 0 {
        println!("⚠️  Calls without a matching band: {}", unmatched);
    }

    println!();
    Ok(())
}

/// Generate JSON report for machine consumption
fn generate_json_report(stats: &ScreenStats) -> Result<()> {
    let json_stats = serde_json::json!({
        "calls_read": stats.calls_read,
        "operators_read": stats.operators_read,
        "calls_matched": stats.calls_matched,
        "rows_published": stats.rows_published,
        "output_path": stats.output_path,
        "processing_time_ms": stats.processing_time_ms,
    });

    println!("{}", serde_json::to_string_pretty(&json_stats).unwrap());
    Ok(())
}

/// Generate CSV report for data analysis
fn generate_csv_report(stats: &ScreenStats) -> Result<()> {
    println!("metric,value");
    println!("calls_read,{}", stats.calls_read);
    println!("operators_read,{}", stats.operators_read);
    println!("calls_matched,{}", stats.calls_matched);
    println!("rows_published,{}", stats.rows_published);
    println!("output_path,{}", stats.output_path.display());
    println!("processing_time_ms,{}", stats.processing_time_ms);

    Ok(())
}
