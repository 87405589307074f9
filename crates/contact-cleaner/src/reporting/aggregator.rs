use crate::dedup::DedupOutcome;
use crate::types::{ContactRecord, FieldIssue, FieldStatus, ReasonCode};
use serde::{Deserialize, Serialize};

/// Per-field tallies of missing and invalid values over all input rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldTallies {
    pub missing_name: usize,
    pub missing_email: usize,
    pub invalid_email: usize,
    pub missing_phone: usize,
    pub invalid_phone: usize,
    pub missing_company: usize,
}

impl FieldTallies {
    /// `(label, count)` pairs in display order.
    pub fn entries(&self) -> [(&'static str, usize); 6] {
        [
            ("missing_name", self.missing_name),
            ("missing_email", self.missing_email),
            ("invalid_email", self.invalid_email),
            ("missing_phone", self.missing_phone),
            ("invalid_phone", self.invalid_phone),
            ("missing_company", self.missing_company),
        ]
    }

    fn record(&mut self, record: &ContactRecord) {
        if record.name.normalized_value.is_empty() {
            self.missing_name += 1;
        }
        if record.email.normalized_value.is_empty() {
            self.missing_email += 1;
        } else if record.email.status == FieldStatus::Invalid(ReasonCode::MalformedEmail) {
            self.invalid_email += 1;
        }
        if record.phone.normalized_value.is_empty() {
            self.missing_phone += 1;
        } else if !record.phone.status.is_valid() {
            self.invalid_phone += 1;
        }
        if record.company.normalized_value.is_empty() {
            self.missing_company += 1;
        }
    }
}

/// Summary of one cleaning run.
///
/// Invariants: `total_output == total_input - total_duplicates_removed` and
/// `total_clean + total_flagged == total_input`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningReport {
    pub total_input: usize,
    pub total_clean: usize,
    pub total_flagged: usize,
    pub total_duplicates_removed: usize,
    pub total_output: usize,
    /// Flagged survivors dropped by the optional exclusion filter.
    #[serde(default)]
    pub flagged_excluded: usize,
    pub field_tallies: FieldTallies,
    /// Every invalid field, by row then field order.
    pub issues: Vec<FieldIssue>,
}

impl CleaningReport {
    /// Rows that end up in the cleaned dataset.
    pub fn rows_written(&self) -> usize {
        self.total_output - self.flagged_excluded
    }

    /// Number of issues carrying the given reason.
    pub fn issue_count(&self, reason: ReasonCode) -> usize {
        self.issues.iter().filter(|i| i.reason == reason).count()
    }
}

/// Builds a [`CleaningReport`] from upstream results without mutating them.
pub struct ReportAggregator;

impl ReportAggregator {
    /// Aggregate the pre-dedup records and the dedup outcome.
    ///
    /// `records` must be the complete processed input, in any order; the
    /// issue listing is sorted here.
    pub fn aggregate(records: &[ContactRecord], outcome: &DedupOutcome) -> CleaningReport {
        let total_input = records.len();
        let total_flagged = records.iter().filter(|r| r.is_flagged()).count();

        let mut field_tallies = FieldTallies::default();
        for record in records {
            field_tallies.record(record);
        }

        let mut issues: Vec<FieldIssue> = records.iter().flat_map(ContactRecord::issues).collect();
        issues.sort_by_key(|issue| (issue.source_row_index, issue.field));

        CleaningReport {
            total_input,
            total_clean: total_input - total_flagged,
            total_flagged,
            total_duplicates_removed: outcome.duplicates_removed,
            total_output: outcome.winners.len(),
            flagged_excluded: 0,
            field_tallies,
            issues,
        }
    }
}
