//! Contact Cleaning Library
//!
//! Cleans a list of contact records (name, email, company, phone) built
//! with Rust and Polars.
//!
//! # Overview
//!
//! - **Ingest**: CSV loading with case-insensitive column mapping
//! - **Normalization**: deterministic, idempotent canonical forms per field
//! - **Validation**: every field is `Valid` or `Invalid` with a reason code
//! - **Deduplication**: one survivor per normalized email, ranked by status,
//!   completeness and input order
//! - **Reporting**: counters, per-field tallies and an itemised issue listing
//! - **Progress Reporting**: stage updates through a pluggable reporter
//!
//! Field-level defects never abort a run. A flagged record is still output
//! (unless exclusion is configured) and listed in the report.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use contact_cleaner::{CleanerConfig, ContactPipeline};
//!
//! let config = CleanerConfig::builder()
//!     .output_dir("output")
//!     .emit_json_report(true)
//!     .build()?;
//!
//! let result = ContactPipeline::builder()
//!     .config(config)
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run("data/contacts_raw.csv")?;
//!
//! println!("{} duplicates removed", result.report.total_duplicates_removed);
//! ```
//!
//! # Using the stages directly
//!
//! ```rust,ignore
//! use contact_cleaner::{Deduplicator, RawContact, RecordProcessor, ReportAggregator};
//!
//! let records = RecordProcessor.process_all(&raws)?;
//! let outcome = Deduplicator.deduplicate(&records);
//! let report = ReportAggregator::aggregate(&records, &outcome);
//! ```

pub mod cleaner;
pub mod config;
pub mod dedup;
pub mod error;
pub mod ingest;
pub mod pipeline;
pub mod reporting;
pub mod types;

// Re-exports for convenient access
pub use cleaner::RecordProcessor;
pub use config::{CleanerConfig, CleanerConfigBuilder, ConfigValidationError};
pub use dedup::{DedupOutcome, Deduplicator};
pub use error::{CleaningError, ResultExt};
pub use ingest::{ColumnMapping, load_contacts, load_csv, raw_contacts_from_frame};
pub use pipeline::{
    ClosureProgressReporter, CleaningResult, CleaningStage, ContactPipeline,
    ContactPipelineBuilder, ProgressReporter, ProgressUpdate,
};
pub use reporting::{CleaningReport, FieldTallies, ReportAggregator, ReportDocument, ReportGenerator};
pub use types::{
    ContactRecord, FieldIssue, FieldKind, FieldStatus, NormalizedField, RawContact, ReasonCode,
    RecordStatus,
};
