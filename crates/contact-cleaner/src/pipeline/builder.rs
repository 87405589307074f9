//! Main cleaning pipeline module.
//!
//! This module provides the core `ContactPipeline` struct and builder for
//! orchestrating ingest, normalization, deduplication and reporting.

use crate::cleaner::RecordProcessor;
use crate::config::{CleanerConfig, ConfigValidationError};
use crate::dedup::Deduplicator;
use crate::error::{Result, ResultExt};
use crate::ingest;
use crate::pipeline::progress::{
    CleaningStage, ClosureProgressReporter, ProgressReporter, ProgressUpdate,
};
use crate::reporting::{CleaningReport, ReportAggregator, ReportDocument, ReportGenerator};
use crate::types::{ContactRecord, RawContact};
use polars::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Label used in reports when records did not come from a file.
const IN_MEMORY_INPUT: &str = "<in-memory>";

/// Outcome of a pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct CleaningResult {
    /// Records written to the cleaned dataset, in source row order.
    pub contacts: Vec<ContactRecord>,
    pub report: CleaningReport,
    /// Path of the cleaned dataset, when saved.
    pub cleaned_path: Option<PathBuf>,
    /// Path of the text report, when saved.
    pub report_path: Option<PathBuf>,
    /// Path of the JSON report, when saved.
    pub json_report_path: Option<PathBuf>,
    pub duration_ms: u64,
}

/// The contact cleaning pipeline.
///
/// Use [`ContactPipeline::builder()`] to create a pipeline with custom
/// configuration.
///
/// # Example
///
/// ```rust,ignore
/// use contact_cleaner::{CleanerConfig, ContactPipeline};
///
/// let result = ContactPipeline::builder()
///     .config(CleanerConfig::builder().exclude_flagged(true).build()?)
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?
///     .run("data/contacts_raw.csv")?;
///
/// println!("{} contacts written", result.report.rows_written());
/// ```
pub struct ContactPipeline {
    config: CleanerConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    processor: RecordProcessor,
    deduplicator: Deduplicator,
    generator: ReportGenerator,
}

// Ensure ContactPipeline can be moved to a worker thread
static_assertions::assert_impl_all!(ContactPipeline: Send);

impl ContactPipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> ContactPipelineBuilder {
        ContactPipelineBuilder::default()
    }

    /// Read a contacts CSV, clean it and, if `save_to_disk` is set, write
    /// the cleaned dataset and reports.
    ///
    /// # Errors
    ///
    /// Fails without writing anything when the input is missing or has no
    /// recognised columns.
    pub fn run(&self, input_path: impl AsRef<Path>) -> Result<CleaningResult> {
        let input_path = input_path.as_ref();
        self.begin();
        self.finish(self.run_internal(input_path))
    }

    /// Clean an already loaded frame.
    pub fn process(&self, df: &DataFrame) -> Result<CleaningResult> {
        self.begin();
        self.finish(self.process_internal(df))
    }

    /// Clean records supplied directly by the caller.
    pub fn process_contacts(&self, raws: &[RawContact]) -> Result<CleaningResult> {
        self.begin();
        self.finish(self.execute(raws, IN_MEMORY_INPUT))
    }

    fn begin(&self) {
        info!("Starting contact cleaning pipeline...");
        self.report_progress(ProgressUpdate::new(
            CleaningStage::Initializing,
            0.0,
            "Starting contact cleaning pipeline...",
        ));
    }

    fn finish(&self, result: Result<CleaningResult>) -> Result<CleaningResult> {
        match result {
            Ok(result) => {
                self.report_progress(ProgressUpdate::complete(format!(
                    "Cleaned {} contacts",
                    result.report.total_input
                )));
                Ok(result)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn run_internal(&self, input_path: &Path) -> Result<CleaningResult> {
        self.report_progress(ProgressUpdate::new(
            CleaningStage::Ingesting,
            0.0,
            format!("Reading {}...", input_path.display()),
        ));
        let raws = ingest::load_contacts(input_path)?;
        self.report_progress(ProgressUpdate::new(
            CleaningStage::Ingesting,
            1.0,
            format!("Read {} rows", raws.len()),
        ));

        self.execute(&raws, &input_path.display().to_string())
    }

    fn process_internal(&self, df: &DataFrame) -> Result<CleaningResult> {
        self.report_progress(ProgressUpdate::new(
            CleaningStage::Ingesting,
            0.0,
            "Mapping input columns...",
        ));
        let raws = ingest::raw_contacts_from_frame(df)?;
        self.execute(&raws, IN_MEMORY_INPUT)
    }

    fn execute(&self, raws: &[RawContact], input_label: &str) -> Result<CleaningResult> {
        let start_time = Instant::now();

        debug!("Cleaning {} rows from {}", raws.len(), input_label);

        // Step 1: normalize and validate
        self.report_progress(ProgressUpdate::new(
            CleaningStage::Normalizing,
            0.0,
            "Normalizing records...",
        ));
        let records = self.processor.process_all(raws)?;
        self.report_progress(ProgressUpdate::new(
            CleaningStage::Normalizing,
            1.0,
            "Normalization complete",
        ));

        // Step 2: deduplicate
        self.report_progress(ProgressUpdate::new(
            CleaningStage::Deduplicating,
            0.0,
            "Removing duplicates...",
        ));
        let outcome = self.deduplicator.deduplicate(&records);
        self.report_progress(ProgressUpdate::new(
            CleaningStage::Deduplicating,
            1.0,
            format!("Removed {} duplicates", outcome.duplicates_removed),
        ));

        // Step 3: report
        self.report_progress(ProgressUpdate::new(
            CleaningStage::Reporting,
            0.0,
            "Building report...",
        ));
        let mut report = ReportAggregator::aggregate(&records, &outcome);
        let mut contacts = outcome.winners;
        if self.config.exclude_flagged {
            let before = contacts.len();
            contacts.retain(|record| !record.is_flagged());
            report.flagged_excluded = before - contacts.len();
            info!(
                "Excluded {} flagged records from output",
                report.flagged_excluded
            );
        }
        self.report_progress(ProgressUpdate::new(
            CleaningStage::Reporting,
            1.0,
            format!("{} field issues found", report.issues.len()),
        ));

        let mut result = CleaningResult {
            contacts,
            report,
            cleaned_path: None,
            report_path: None,
            json_report_path: None,
            duration_ms: 0,
        };

        // Step 4: save
        if self.config.save_to_disk {
            self.save(&mut result, input_label)
                .context("Saving cleaning output")?;
        } else {
            debug!("save_to_disk disabled; keeping results in memory");
        }

        result.duration_ms = start_time.elapsed().as_millis() as u64;
        info!(
            "Cleaning complete in {}ms: {} in, {} out, {} flagged, {} duplicates removed",
            result.duration_ms,
            result.report.total_input,
            result.report.rows_written(),
            result.report.total_flagged,
            result.report.total_duplicates_removed
        );
        Ok(result)
    }

    fn save(&self, result: &mut CleaningResult, input_label: &str) -> Result<()> {
        self.report_progress(ProgressUpdate::new(
            CleaningStage::Saving,
            0.0,
            "Writing cleaned dataset...",
        ));
        let cleaned_path = self.generator.write_cleaned_csv(&result.contacts)?;

        self.report_progress(ProgressUpdate::new(
            CleaningStage::Saving,
            0.5,
            "Writing report...",
        ));
        if let Err(e) = self.write_reports(result, input_label, &cleaned_path) {
            // Remove whatever was written so far
            for path in std::iter::once(&cleaned_path).chain(result.report_path.as_ref()) {
                if let Err(remove_err) = fs::remove_file(path) {
                    warn!("Could not remove {}: {}", path.display(), remove_err);
                }
            }
            return Err(e);
        }
        result.cleaned_path = Some(cleaned_path);

        self.report_progress(ProgressUpdate::new(
            CleaningStage::Saving,
            1.0,
            "Output saved",
        ));
        Ok(())
    }

    fn write_reports(
        &self,
        result: &mut CleaningResult,
        input_label: &str,
        cleaned_path: &Path,
    ) -> Result<()> {
        result.report_path = Some(
            self.generator
                .write_text_report(&result.report, input_label)?,
        );

        if self.config.emit_json_report {
            let document = ReportDocument::new(
                input_label,
                Some(cleaned_path),
                self.config.exclude_flagged,
                &result.report,
            );
            result.json_report_path = Some(self.generator.write_json_report(&document)?);
        }
        Ok(())
    }
}

/// Builder for [`ContactPipeline`].
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = ContactPipeline::builder()
///     .config(CleanerConfig::default())
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?;
/// ```
#[derive(Default)]
pub struct ContactPipelineBuilder {
    config: Option<CleanerConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(ContactPipelineBuilder: Send);

impl ContactPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: CleanerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving updates during processing.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// This is a convenience method for simple progress handling.
    /// For more complex scenarios, use [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<ContactPipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let generator = ReportGenerator::new(
            config.output_dir.clone(),
            config.output_name.clone(),
            config.report_name.clone(),
        );

        Ok(ContactPipeline {
            config,
            progress_reporter: self.progress_reporter,
            processor: RecordProcessor,
            deduplicator: Deduplicator,
            generator,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldKind;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn in_memory() -> CleanerConfig {
        CleanerConfig::builder().save_to_disk(false).build().unwrap()
    }

    fn raw(index: usize, name: &str, email: &str, company: &str, phone: &str) -> RawContact {
        RawContact::new(index)
            .with(FieldKind::Name, name)
            .with(FieldKind::Email, email)
            .with(FieldKind::Company, company)
            .with(FieldKind::Phone, phone)
    }

    #[test]
    fn test_pipeline_builder_default() {
        let pipeline = ContactPipeline::builder().build().unwrap();
        assert!(pipeline.progress_reporter.is_none());
        assert!(pipeline.config.save_to_disk);
    }

    #[test]
    fn test_pipeline_builder_rejects_invalid_config() {
        let config = CleanerConfig {
            output_name: String::new(),
            ..CleanerConfig::default()
        };
        let result = ContactPipeline::builder().config(config).build();
        assert!(matches!(result, Err(ConfigValidationError::EmptyName(_))));
    }

    #[test]
    fn test_pipeline_builder_with_progress_callback() {
        let call_count = Arc::new(AtomicUsize::new(0));
        let call_count_clone = call_count.clone();

        let pipeline = ContactPipeline::builder()
            .on_progress(move |_update| {
                call_count_clone.fetch_add(1, Ordering::SeqCst);
            })
            .build()
            .unwrap();

        pipeline.report_progress(ProgressUpdate::new(CleaningStage::Normalizing, 0.5, "Test"));

        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_process_contacts_in_memory() {
        let pipeline = ContactPipeline::builder()
            .config(in_memory())
            .build()
            .unwrap();

        let result = pipeline
            .process_contacts(&[
                raw(0, " alice ", "ALICE@X.COM", "", "07123456789"),
                raw(1, "Alice", "alice@x.com", "", "+447123456789"),
                raw(2, "Bob", "not-an-email", "", ""),
            ])
            .unwrap();

        assert_eq!(result.report.total_input, 3);
        assert_eq!(result.report.total_duplicates_removed, 1);
        assert_eq!(result.report.total_output, 2);
        assert_eq!(result.contacts.len(), 2);
        assert_eq!(result.contacts[0].source_row_index, 0);
        assert_eq!(result.contacts[1].source_row_index, 2);
        assert!(result.cleaned_path.is_none());
        assert!(result.report_path.is_none());
    }

    #[test]
    fn test_exclude_flagged_keeps_report_invariants() {
        let config = CleanerConfig::builder()
            .save_to_disk(false)
            .exclude_flagged(true)
            .build()
            .unwrap();
        let pipeline = ContactPipeline::builder().config(config).build().unwrap();

        let result = pipeline
            .process_contacts(&[
                raw(0, "Ann", "ann@x.com", "", ""),
                raw(1, "Bob", "not-an-email", "", ""),
            ])
            .unwrap();

        let report = &result.report;
        assert_eq!(report.total_output, 2);
        assert_eq!(report.flagged_excluded, 1);
        assert_eq!(report.rows_written(), 1);
        assert_eq!(report.total_output + report.total_duplicates_removed, report.total_input);
        assert_eq!(result.contacts.len(), 1);
        assert!(!result.contacts[0].is_flagged());
        assert_eq!(report.issues.len(), 1);
    }

    #[test]
    fn test_row_index_contract_reports_failure() {
        let stages = Arc::new(Mutex::new(Vec::new()));
        let stages_clone = stages.clone();

        let pipeline = ContactPipeline::builder()
            .config(in_memory())
            .on_progress(move |update| {
                stages_clone.lock().unwrap().push(update.stage);
            })
            .build()
            .unwrap();

        let err = pipeline
            .process_contacts(&[raw(1, "A", "", "", ""), raw(0, "B", "", "", "")])
            .unwrap_err();

        assert_eq!(err.error_code(), "ROW_INDEX_CONTRACT");
        assert_eq!(stages.lock().unwrap().last(), Some(&CleaningStage::Failed));
    }

    #[test]
    fn test_progress_stages_in_order() {
        let stages = Arc::new(Mutex::new(Vec::new()));
        let stages_clone = stages.clone();

        let pipeline = ContactPipeline::builder()
            .config(in_memory())
            .on_progress(move |update| {
                stages_clone.lock().unwrap().push(update.stage);
            })
            .build()
            .unwrap();

        pipeline.process_contacts(&[raw(0, "A", "a@x.com", "", "")]).unwrap();

        let mut seen = stages.lock().unwrap().clone();
        seen.dedup();
        assert_eq!(
            seen,
            vec![
                CleaningStage::Initializing,
                CleaningStage::Normalizing,
                CleaningStage::Deduplicating,
                CleaningStage::Reporting,
                CleaningStage::Complete,
            ]
        );
    }

    #[test]
    fn test_process_frame() {
        let df = df!(
            "Name" => ["carol", "CAROL"],
            "Email" => ["carol@x.com", " Carol@X.com "],
        )
        .unwrap();

        let pipeline = ContactPipeline::builder()
            .config(in_memory())
            .build()
            .unwrap();
        let result = pipeline.process(&df).unwrap();

        assert_eq!(result.contacts.len(), 1);
        assert_eq!(result.contacts[0].name.normalized_value, "Carol");
        assert_eq!(result.report.total_duplicates_removed, 1);
    }
}
