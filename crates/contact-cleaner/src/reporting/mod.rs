//! Report aggregation and output artifacts.
//!
//! [`ReportAggregator`] turns processed records and the deduplication
//! outcome into a [`CleaningReport`] value. [`ReportGenerator`] writes the
//! artifacts of a run:
//!
//! - the cleaned dataset (`cleaned_contacts.csv` by default)
//! - the text report (`cleaning_report.txt`)
//! - optionally, the JSON [`ReportDocument`] (`cleaning_report.json`)
//!
//! # Example
//!
//! ```rust,ignore
//! use contact_cleaner::reporting::{ReportAggregator, ReportGenerator, render_text};
//!
//! let report = ReportAggregator::aggregate(&records, &outcome);
//! println!("{}", render_text(&report, "data/contacts_raw.csv"));
//!
//! let generator = ReportGenerator::new("output", "cleaned_contacts", "cleaning_report");
//! generator.write_cleaned_csv(&outcome.winners)?;
//! generator.write_text_report(&report, "data/contacts_raw.csv")?;
//! ```

mod aggregator;
mod generator;

pub use aggregator::{CleaningReport, FieldTallies, ReportAggregator};
pub use generator::{ReportDocument, ReportGenerator, contacts_to_frame, render_text};
