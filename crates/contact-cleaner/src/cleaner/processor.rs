//! Turns raw rows into annotated contact records.

use super::normalizers::{normalize_company, normalize_email, normalize_name, normalize_phone};
use super::validators::{validate_company, validate_email, validate_phone, validate_required};
use crate::error::{CleaningError, Result};
use crate::types::{ContactRecord, FieldStatus, NormalizedField, RawContact, RecordStatus};
use tracing::{debug, info};

/// Applies normalization and validation to whole contact records.
///
/// Malformed field content never fails a record: it is captured as an
/// `Invalid` status and the record continues through the pipeline.
pub struct RecordProcessor;

impl RecordProcessor {
    /// Normalize and validate a single row.
    pub fn process(&self, raw: &RawContact) -> ContactRecord {
        let name = Self::field(&raw.name, normalize_name, validate_required);
        let email = Self::field(&raw.email, normalize_email, |value| {
            match validate_required(value) {
                FieldStatus::Valid => validate_email(value),
                invalid => invalid,
            }
        });
        let company = Self::field(&raw.company, normalize_company, validate_company);
        let phone = Self::field(&raw.phone, normalize_phone, validate_phone);

        let fields = [&name, &email, &company, &phone];
        let completeness_score = fields.iter().filter(|f| f.is_complete()).count() as u8;
        let overall_status = if fields.iter().all(|f| f.status.is_valid()) {
            RecordStatus::Clean
        } else {
            RecordStatus::Flagged
        };

        ContactRecord {
            name,
            email,
            company,
            phone,
            source_row_index: raw.source_row_index,
            completeness_score,
            overall_status,
        }
    }

    /// Process a batch of rows in input order.
    ///
    /// Row indices must be strictly increasing; anything else means the
    /// input layer broke its contract and the run is aborted.
    pub fn process_all(&self, raws: &[RawContact]) -> Result<Vec<ContactRecord>> {
        let mut previous: Option<usize> = None;
        let mut records = Vec::with_capacity(raws.len());

        for raw in raws {
            let index = raw.source_row_index;
            if let Some(previous) = previous
                && index <= previous
            {
                return Err(CleaningError::RowIndexContract { previous, index });
            }
            previous = Some(index);

            let record = self.process(raw);
            if record.is_flagged() {
                debug!(
                    "Row {} flagged: {:?}",
                    index,
                    record
                        .issues()
                        .iter()
                        .map(|issue| format!("{} {}", issue.field, issue.reason))
                        .collect::<Vec<_>>()
                );
            }
            records.push(record);
        }

        let flagged = records.iter().filter(|r| r.is_flagged()).count();
        info!(
            "Processed {} records ({} clean, {} flagged)",
            records.len(),
            records.len() - flagged,
            flagged
        );

        Ok(records)
    }

    fn field(
        raw: &str,
        normalize: impl Fn(&str) -> String,
        validate: impl Fn(&str) -> FieldStatus,
    ) -> NormalizedField {
        let normalized = normalize(raw);
        let status = validate(&normalized);
        NormalizedField::new(raw, normalized, status)
    }
}
