use super::aggregator::CleaningReport;
use crate::error::{CleaningError, Result, ResultExt};
use crate::types::{ContactRecord, FieldKind};
use chrono::Local;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const RULE_WIDTH: usize = 30;

// ============================================================================
// Report document
// ============================================================================

/// Report plus run metadata, as written to JSON and printed by `--json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDocument {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path to the input file
    pub input_file: String,
    /// Path to the cleaned dataset (if written)
    pub output_file: Option<String>,
    /// Whether flagged records were excluded from the cleaned dataset
    pub flagged_excluded_from_output: bool,
    pub report: CleaningReport,
}

impl ReportDocument {
    pub fn new(
        input_file: &str,
        output_file: Option<&Path>,
        exclude_flagged: bool,
        report: &CleaningReport,
    ) -> Self {
        Self {
            generated_at: timestamp(),
            input_file: input_file.to_string(),
            output_file: output_file.map(|p| p.display().to_string()),
            flagged_excluded_from_output: exclude_flagged,
            report: report.clone(),
        }
    }
}

// ============================================================================
// Generator
// ============================================================================

/// Writes the cleaned dataset and the reports to an output directory.
pub struct ReportGenerator {
    output_dir: PathBuf,
    output_name: String,
    report_name: String,
}

impl ReportGenerator {
    /// Create a new ReportGenerator with custom output settings.
    pub fn new(
        output_dir: impl Into<PathBuf>,
        output_name: impl Into<String>,
        report_name: impl Into<String>,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            output_name: output_name.into(),
            report_name: report_name.into(),
        }
    }

    pub fn cleaned_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.csv", self.output_name))
    }

    pub fn text_report_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.txt", self.report_name))
    }

    pub fn json_report_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.json", self.report_name))
    }

    /// Write surviving records as `name,email,company,phone` using the
    /// normalized values.
    pub fn write_cleaned_csv(&self, records: &[ContactRecord]) -> Result<PathBuf> {
        let mut df = contacts_to_frame(records)?;

        fs::create_dir_all(&self.output_dir)
            .context(format!("Creating {}", self.output_dir.display()))?;
        let output_path = self.cleaned_path();
        let mut file = File::create(&output_path)
            .context(format!("Creating {}", output_path.display()))?;

        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(b',')
            .with_quote_char(b'"')
            .finish(&mut df)
            .map_err(|e| CleaningError::ReportGenerationFailed(e.to_string()))?;

        info!(
            "Cleaned dataset saved: {} ({} rows)",
            output_path.display(),
            records.len()
        );
        Ok(output_path)
    }

    /// Write the human-readable report.
    pub fn write_text_report(&self, report: &CleaningReport, input_file: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)
            .context(format!("Creating {}", self.output_dir.display()))?;
        let report_path = self.text_report_path();
        let mut file = File::create(&report_path)
            .context(format!("Creating {}", report_path.display()))?;
        file.write_all(render_text(report, input_file).as_bytes())
            .context(format!("Writing {}", report_path.display()))?;

        info!("Report saved: {}", report_path.display());
        Ok(report_path)
    }

    /// Write the JSON report document.
    pub fn write_json_report(&self, document: &ReportDocument) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)
            .context(format!("Creating {}", self.output_dir.display()))?;
        let report_path = self.json_report_path();
        let json = serde_json::to_string_pretty(document)?;
        let mut file = File::create(&report_path)
            .context(format!("Creating {}", report_path.display()))?;
        file.write_all(json.as_bytes())
            .context(format!("Writing {}", report_path.display()))?;

        info!("JSON report saved: {}", report_path.display());
        Ok(report_path)
    }
}

/// Build a string frame of normalized values; empty values become nulls so
/// they are written as empty cells.
pub fn contacts_to_frame(records: &[ContactRecord]) -> Result<DataFrame> {
    let columns: Vec<Column> = FieldKind::ALL
        .iter()
        .map(|kind| {
            let values: Vec<Option<&str>> = records
                .iter()
                .map(|r| {
                    let value = r.field(*kind).normalized_value.as_str();
                    (!value.is_empty()).then_some(value)
                })
                .collect();
            Column::from(Series::new(kind.column_name().into(), values))
        })
        .collect();

    let df = DataFrame::new(columns)?;
    debug!("Built output frame: {:?}", df.shape());
    Ok(df)
}

/// Render the report as plain text.
///
/// Lists the counters, the per-field tallies and every issue in aggregator
/// order, one `row <index>: <field> <ReasonCode>` line each.
pub fn render_text(report: &CleaningReport, input_file: &str) -> String {
    let mut lines = vec![
        "CLEANING REPORT".to_string(),
        "=".repeat(RULE_WIDTH),
        format!("generated_at: {}", timestamp()),
        format!("input_file: {input_file}"),
        String::new(),
        format!("total_input: {}", report.total_input),
        format!("total_clean: {}", report.total_clean),
        format!("total_flagged: {}", report.total_flagged),
        format!("total_duplicates_removed: {}", report.total_duplicates_removed),
        format!("total_output: {}", report.total_output),
    ];
    if report.flagged_excluded > 0 {
        lines.push(format!("flagged_excluded: {}", report.flagged_excluded));
        lines.push(format!("rows_written: {}", report.rows_written()));
    }

    lines.push(String::new());
    lines.extend(
        report
            .field_tallies
            .entries()
            .iter()
            .map(|(label, count)| format!("{label}: {count}")),
    );

    lines.push(String::new());
    lines.push(format!("ISSUES ({})", report.issues.len()));
    lines.push("-".repeat(RULE_WIDTH));
    if report.issues.is_empty() {
        lines.push("No field issues found".to_string());
    }
    lines.extend(report.issues.iter().map(ToString::to_string));

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
