//! Duplicate contact resolution.
//!
//! Records sharing a normalized email form a duplicate group and exactly one
//! survives. Records without an email are never merged with each other.
//!
//! Winner ranking, highest first:
//! 1. `Clean` before `Flagged`
//! 2. higher completeness score
//! 3. smaller source row index
//!
//! Survivors are returned in ascending source row order regardless of the
//! group they came from.

use crate::types::{ContactRecord, RecordStatus};
use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::collections::HashMap;
use tracing::{debug, info};

/// Result of a deduplication pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupOutcome {
    /// Surviving records in ascending source row order.
    pub winners: Vec<ContactRecord>,
    /// Number of input records that were merged away.
    pub duplicates_removed: usize,
}

/// Groups records by identity key and keeps the best of each group.
pub struct Deduplicator;

impl Deduplicator {
    pub fn deduplicate(&self, records: &[ContactRecord]) -> DedupOutcome {
        // identity key -> index into `winners`
        let mut by_key: HashMap<&str, usize> = HashMap::new();
        let mut winners: Vec<&ContactRecord> = Vec::with_capacity(records.len());

        for record in records {
            let Some(key) = record.identity_key() else {
                winners.push(record);
                continue;
            };

            match by_key.get(key) {
                None => {
                    by_key.insert(key, winners.len());
                    winners.push(record);
                }
                Some(&slot) => {
                    let incumbent = winners[slot];
                    let (kept, dropped) = if Self::outranks(record, incumbent) {
                        winners[slot] = record;
                        (record, incumbent)
                    } else {
                        (incumbent, record)
                    };
                    debug!(
                        "Duplicate '{}': keeping row {}, dropping row {}",
                        key, kept.source_row_index, dropped.source_row_index
                    );
                }
            }
        }

        let mut winners: Vec<ContactRecord> = winners.into_iter().cloned().collect();
        winners.sort_by_key(|r| r.source_row_index);
        let duplicates_removed = records.len() - winners.len();

        info!(
            "Deduplication kept {} of {} records ({} duplicates removed)",
            winners.len(),
            records.len(),
            duplicates_removed
        );

        DedupOutcome {
            winners,
            duplicates_removed,
        }
    }

    /// Whether `challenger` should replace `incumbent` as a group's winner.
    fn outranks(challenger: &ContactRecord, incumbent: &ContactRecord) -> bool {
        Self::rank(challenger, incumbent) == Ordering::Greater
    }

    /// Total order over records of one group; `Greater` ranks higher.
    pub fn rank(a: &ContactRecord, b: &ContactRecord) -> Ordering {
        let key = |r: &ContactRecord| {
            (
                r.overall_status == RecordStatus::Clean,
                r.completeness_score,
                Reverse(r.source_row_index),
            )
        };
        key(a).cmp(&key(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaner::RecordProcessor;
    use crate::types::{FieldKind, RawContact};
    use std::collections::HashSet;

    fn record(index: usize, name: &str, email: &str, company: &str, phone: &str) -> ContactRecord {
        RecordProcessor.process(
            &RawContact::new(index)
                .with(FieldKind::Name, name)
                .with(FieldKind::Email, email)
                .with(FieldKind::Company, company)
                .with(FieldKind::Phone, phone),
        )
    }

    fn indices(outcome: &DedupOutcome) -> Vec<usize> {
        outcome.winners.iter().map(|r| r.source_row_index).collect()
    }

    #[test]
    fn test_tie_resolves_to_earliest_row() {
        let records = vec![
            record(0, " alice ", "ALICE@X.COM", "", "07123456789"),
            record(1, "Alice", "alice@x.com", "", "+447123456789"),
        ];
        assert_eq!(records[0].completeness_score, records[1].completeness_score);

        let outcome = Deduplicator.deduplicate(&records);
        assert_eq!(indices(&outcome), vec![0]);
        assert_eq!(outcome.duplicates_removed, 1);
    }

    #[test]
    fn test_clean_beats_flagged_in_either_order() {
        let flagged_first = vec![
            record(0, "Bob", "bob@x.com", "Acme", "12345"),
            record(1, "Bob", "bob@x.com", "", ""),
        ];
        assert!(flagged_first[0].is_flagged());
        assert_eq!(indices(&Deduplicator.deduplicate(&flagged_first)), vec![1]);

        let clean_first = vec![
            record(0, "Bob", "bob@x.com", "", ""),
            record(1, "Bob", "bob@x.com", "Acme", "12345"),
        ];
        assert_eq!(indices(&Deduplicator.deduplicate(&clean_first)), vec![0]);
    }

    #[test]
    fn test_higher_completeness_wins() {
        let records = vec![
            record(0, "Carol", "carol@x.com", "", ""),
            record(1, "Carol", "carol@x.com", "Acme", "07123456789"),
        ];
        let outcome = Deduplicator.deduplicate(&records);
        assert_eq!(indices(&outcome), vec![1]);
        assert_eq!(outcome.winners[0].completeness_score, 4);
    }

    #[test]
    fn test_empty_emails_never_merge() {
        let records = vec![
            record(0, "Dan", "", "", ""),
            record(1, "Dan", "", "", ""),
            record(2, "", "  ", "", ""),
        ];
        let outcome = Deduplicator.deduplicate(&records);
        assert_eq!(indices(&outcome), vec![0, 1, 2]);
        assert_eq!(outcome.duplicates_removed, 0);
    }

    #[test]
    fn test_winners_in_input_order_across_groups() {
        let records = vec![
            record(0, "A", "a@x.com", "", ""),
            record(1, "B", "b@x.com", "", ""),
            record(2, "A", "a@x.com", "Acme", ""),
            record(3, "C", "", "", ""),
            record(4, "B", "b@x.com", "", ""),
        ];
        let outcome = Deduplicator.deduplicate(&records);
        assert_eq!(indices(&outcome), vec![1, 2, 3]);
        assert_eq!(outcome.duplicates_removed, 2);
    }

    #[test]
    fn test_malformed_identical_emails_are_merged() {
        let records = vec![
            record(0, "E", "not-an-email", "", ""),
            record(1, "E", "NOT-AN-EMAIL", "", ""),
        ];
        let outcome = Deduplicator.deduplicate(&records);
        assert_eq!(indices(&outcome), vec![0]);
    }

    #[test]
    fn test_no_two_winners_share_an_email() {
        let emails = ["a@x.com", "", "A@X.com", "b@x.com", "", "b@x.com ", "junk", "junk"];
        let records: Vec<ContactRecord> = emails
            .iter()
            .enumerate()
            .map(|(i, email)| record(i, "N", email, "", ""))
            .collect();

        let outcome = Deduplicator.deduplicate(&records);
        assert!(outcome.winners.len() <= records.len());
        assert_eq!(outcome.winners.len() + outcome.duplicates_removed, records.len());

        let mut seen = HashSet::new();
        for winner in &outcome.winners {
            if let Some(key) = winner.identity_key() {
                assert!(seen.insert(key.to_string()), "duplicate survivor {key}");
            }
        }
        assert_eq!(outcome.winners.len(), 5);
    }

    #[test]
    fn test_empty_input() {
        let outcome = Deduplicator.deduplicate(&[]);
        assert!(outcome.winners.is_empty());
        assert_eq!(outcome.duplicates_removed, 0);
    }
}
