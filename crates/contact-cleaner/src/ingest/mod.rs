//! Input ingestion: CSV loading and column mapping.
//!
//! External column names are mapped onto the four logical field slots once,
//! here, so the record processor never sees format variance. Headers match
//! case-insensitively; extra columns are ignored; a missing column reads as
//! empty for every row. Only an input with none of the expected columns is
//! rejected.

use crate::error::{CleaningError, Result, ResultExt};
use crate::types::{FieldKind, RawContact};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info, warn};

/// Which input column feeds each logical field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    slots: [Option<String>; 4],
}

impl ColumnMapping {
    /// Resolve headers onto field slots.
    ///
    /// The first header matching a field wins; later duplicates are ignored
    /// with a warning.
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Result<Self> {
        let mut mapping = Self::default();

        for header in headers {
            let header = header.as_ref();
            let Some(kind) = FieldKind::from_header(header) else {
                debug!("Ignoring unrecognised column '{}'", header);
                continue;
            };
            if let Some(existing) = mapping.column_for(kind) {
                warn!(
                    "Column '{}' also maps to {}; keeping '{}'",
                    header, kind, existing
                );
                continue;
            }
            debug!("Mapped column '{}' -> {}", header, kind);
            mapping.slots[kind as usize] = Some(header.to_string());
        }

        if mapping.slots.iter().all(Option::is_none) {
            return Err(CleaningError::NoRecognizedColumns {
                found: headers.iter().map(|h| h.as_ref().to_string()).collect(),
            });
        }

        let missing = mapping.missing();
        if !missing.is_empty() {
            warn!("Input has no column for {:?}; treating as empty", missing);
        }
        Ok(mapping)
    }

    /// The input column feeding `kind`, if any.
    pub fn column_for(&self, kind: FieldKind) -> Option<&str> {
        self.slots[kind as usize].as_deref()
    }

    /// Logical fields with no input column.
    pub fn missing(&self) -> Vec<FieldKind> {
        FieldKind::ALL
            .into_iter()
            .filter(|kind| self.column_for(*kind).is_none())
            .collect()
    }
}

/// Load a contacts CSV with every column read as a string.
///
/// Schema inference is disabled so phone numbers keep their leading zeros.
/// If the first read fails, the file is retried with blank lines removed.
pub fn load_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(CleaningError::InputNotFound(path.to_path_buf()));
    }

    match string_csv_options()
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => debug!("Standard loading failed: {}", e),
    }

    let content = std::fs::read_to_string(path).context(format!("Reading {}", path.display()))?;
    let cleaned = strip_blank_lines(&content);
    string_csv_options()
        .into_reader_with_file_handle(Cursor::new(cleaned))
        .finish()
        .context(format!("Parsing {}", path.display()))
}

/// Map a frame's rows onto [`RawContact`]s tagged with 0-based row indices.
pub fn raw_contacts_from_frame(df: &DataFrame) -> Result<Vec<RawContact>> {
    let headers: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect();
    let mapping = ColumnMapping::from_headers(&headers)?;

    let mut contacts: Vec<RawContact> = (0..df.height()).map(RawContact::new).collect();
    for kind in FieldKind::ALL {
        let Some(column) = mapping.column_for(kind) else {
            continue;
        };
        let series = df
            .column(column)?
            .as_materialized_series()
            .cast(&DataType::String)?;
        for (contact, value) in contacts.iter_mut().zip(series.str()?.into_iter()) {
            if let Some(value) = value {
                contact.set(kind, value.to_string());
            }
        }
    }

    Ok(contacts)
}

/// Load and map a contacts file in one step.
pub fn load_contacts(path: impl AsRef<Path>) -> Result<Vec<RawContact>> {
    let path = path.as_ref();
    let df = load_csv(path)?;
    info!("Loaded {} rows from {}", df.height(), path.display());
    raw_contacts_from_frame(&df).context("Mapping input columns")
}

fn string_csv_options() -> CsvReadOptions {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
}

fn strip_blank_lines(content: &str) -> String {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_is_case_insensitive() {
        let mapping = ColumnMapping::from_headers(&[" Phone", "EMAIL", "Name", "Company "]).unwrap();
        assert_eq!(mapping.column_for(FieldKind::Email), Some("EMAIL"));
        assert_eq!(mapping.column_for(FieldKind::Phone), Some(" Phone"));
        assert!(mapping.missing().is_empty());
    }

    #[test]
    fn test_mapping_ignores_extra_and_keeps_first_duplicate() {
        let mapping = ColumnMapping::from_headers(&["email", "notes", "Email"]).unwrap();
        assert_eq!(mapping.column_for(FieldKind::Email), Some("email"));
        assert_eq!(
            mapping.missing(),
            vec![FieldKind::Name, FieldKind::Company, FieldKind::Phone]
        );
    }

    #[test]
    fn test_mapping_without_known_columns_is_structural_error() {
        let err = ColumnMapping::from_headers(&["foo", "bar"]).unwrap_err();
        assert_eq!(err.error_code(), "NO_RECOGNIZED_COLUMNS");
        assert!(err.is_structural());
    }

    #[test]
    fn test_raw_contacts_from_frame() {
        let df = df!(
            "Full Notes" => ["x", "y"],
            "NAME" => [Some(" alice "), None],
            "Email" => ["ALICE@X.COM", "bob@x.com"],
        )
        .unwrap();

        let contacts = raw_contacts_from_frame(&df).unwrap();
        assert_eq!(contacts.len(), 2);
        assert_eq!(contacts[0].source_row_index, 0);
        assert_eq!(contacts[0].name, " alice ");
        assert_eq!(contacts[0].email, "ALICE@X.COM");
        assert_eq!(contacts[1].source_row_index, 1);
        assert_eq!(contacts[1].name, "");
        assert_eq!(contacts[1].phone, "");
    }

    #[test]
    fn test_raw_contacts_from_frame_first_duplicate_column_wins() {
        let df = df!(
            "Email" => ["first@x.com"],
            "email" => ["second@x.com"],
        )
        .unwrap();

        let contacts = raw_contacts_from_frame(&df).unwrap();
        assert_eq!(contacts[0].email, "first@x.com");
    }

    #[test]
    fn test_load_csv_missing_file() {
        let err = load_csv("definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, CleaningError::InputNotFound(_)));
    }

    #[test]
    fn test_strip_blank_lines() {
        assert_eq!(strip_blank_lines("a,b\n\n  \n1,2\n"), "a,b\n1,2");
    }
}
