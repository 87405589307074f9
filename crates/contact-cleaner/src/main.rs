//! CLI entry point for the contact cleaning pipeline.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use contact_cleaner::{CleanerConfig, CleaningResult, ContactPipeline, ReasonCode, ReportDocument};
use dotenv::dotenv;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Contact list cleaning and deduplication",
    long_about = "Normalizes, validates and deduplicates a CSV of contacts \
                  (name, email, company, phone).\n\n\
                  EXAMPLES:\n  \
                  # Clean the default input into ./output\n  \
                  contact-cleaner\n\n  \
                  # Custom input and output directory\n  \
                  contact-cleaner -i leads.csv -o results/\n\n  \
                  # Only write clean records, also emit a JSON report\n  \
                  contact-cleaner -i leads.csv --exclude-flagged -r"
)]
struct Args {
    /// Path to the contacts CSV
    #[arg(short, long, default_value = "data/contacts_raw.csv")]
    input: String,

    /// Output directory for the cleaned dataset and reports
    #[arg(short, long, default_value = "output")]
    output: String,

    /// Cleaned dataset file name (without extension)
    #[arg(long, default_value = "cleaned_contacts")]
    output_name: String,

    /// Leave flagged records out of the cleaned dataset
    ///
    /// They are still counted and listed in the report.
    #[arg(long)]
    exclude_flagged: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Also write the report as JSON to the output directory
    #[arg(short = 'r', long)]
    emit_report: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is disabled so stdout only carries
/// the JSON report.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    // Load environment variables from .env file
    dotenv().ok();

    let config = CleanerConfig::builder()
        .output_dir(&args.output)
        .output_name(&args.output_name)
        .exclude_flagged(args.exclude_flagged)
        .emit_json_report(args.emit_report)
        .build()?;

    let pipeline = build_pipeline(&args, config)?;

    info!("Cleaning contacts from: {}", args.input);
    let result = pipeline
        .run(&args.input)
        .map_err(|e| anyhow!("Pipeline failed [{}]: {}", e.error_code(), e))?;

    handle_pipeline_output(&result, &args)
}

fn build_pipeline(args: &Args, config: CleanerConfig) -> Result<ContactPipeline> {
    let mut builder = ContactPipeline::builder().config(config);

    if !args.quiet && !args.json {
        builder = builder.on_progress(|update| {
            info!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        });
    }

    Ok(builder.build()?)
}

/// Handle pipeline output based on CLI flags.
///
/// - Default: print a human-readable summary to stdout
/// - `--json`: print the JSON report document to stdout only
fn handle_pipeline_output(result: &CleaningResult, args: &Args) -> Result<()> {
    if args.json {
        let document = ReportDocument::new(
            &args.input,
            result.cleaned_path.as_deref(),
            args.exclude_flagged,
            &result.report,
        );
        let json =
            serde_json::to_string_pretty(&document).context("Serializing report document")?;
        println!("{json}");
        return Ok(());
    }

    print_human_readable_summary(result, args);
    Ok(())
}

/// Print a human-readable summary of the cleaning results.
fn print_human_readable_summary(result: &CleaningResult, args: &Args) {
    let report = &result.report;

    println!();
    println!("{}", "=".repeat(60));
    println!("CLEANING COMPLETE");
    println!("{}", "=".repeat(60));
    println!();

    println!("Input:  {} ({} rows)", args.input, report.total_input);
    match &result.cleaned_path {
        Some(path) => println!("Output: {} ({} rows)", path.display(), report.rows_written()),
        None => println!("Output: not saved ({} rows)", report.rows_written()),
    }
    println!();

    println!("Summary:");
    println!("  Duration: {}ms", result.duration_ms);
    println!("  Clean: {}", report.total_clean);
    println!("  Flagged: {}", report.total_flagged);
    println!("  Duplicates removed: {}", report.total_duplicates_removed);
    if report.flagged_excluded > 0 {
        println!("  Flagged excluded from output: {}", report.flagged_excluded);
    }
    println!();

    println!("Field issues:");
    for (label, count) in report.field_tallies.entries() {
        println!("  {label}: {count}");
    }
    println!(
        "  {} issues ({} empty, {} malformed email, {} malformed phone)",
        report.issues.len(),
        report.issue_count(ReasonCode::Empty),
        report.issue_count(ReasonCode::MalformedEmail),
        report.issue_count(ReasonCode::MalformedPhone)
    );
    println!();

    if let Some(path) = &result.report_path {
        println!("Report: {}", path.display());
    }
    if let Some(path) = &result.json_report_path {
        println!("JSON report: {}", path.display());
    }
    println!("{}", "=".repeat(60));
}
