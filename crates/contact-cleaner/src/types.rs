use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Field identity
// ============================================================================

/// The four logical contact fields.
///
/// Declaration order is the fixed order used by the issue listing and the
/// cleaned CSV header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Name,
    Email,
    Company,
    Phone,
}

impl FieldKind {
    /// All fields in report order.
    pub const ALL: [FieldKind; 4] = [Self::Name, Self::Email, Self::Company, Self::Phone];

    /// Column name used in the cleaned CSV and the report.
    pub fn column_name(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Company => "company",
            Self::Phone => "phone",
        }
    }

    /// Resolve an external column header onto a logical field.
    ///
    /// Matching ignores case and surrounding whitespace; anything else is
    /// unrecognised.
    pub fn from_header(header: &str) -> Option<Self> {
        match header.trim().to_lowercase().as_str() {
            "name" => Some(Self::Name),
            "email" => Some(Self::Email),
            "company" => Some(Self::Company),
            "phone" => Some(Self::Phone),
            _ => None,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

// ============================================================================
// Validation outcome
// ============================================================================

/// Why a field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReasonCode {
    MissingRequired,
    MalformedEmail,
    MalformedPhone,
    Empty,
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Self::MissingRequired => "MissingRequired",
            Self::MalformedEmail => "MalformedEmail",
            Self::MalformedPhone => "MalformedPhone",
            Self::Empty => "Empty",
        };
        f.write_str(code)
    }
}

/// Validity classification of a normalized value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum FieldStatus {
    Valid,
    Invalid(ReasonCode),
}

impl FieldStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// The reason code, if invalid.
    pub fn reason(&self) -> Option<ReasonCode> {
        match self {
            Self::Valid => None,
            Self::Invalid(reason) => Some(*reason),
        }
    }
}

/// A field value in raw and canonical form with its validity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedField {
    pub raw_value: String,
    pub normalized_value: String,
    pub status: FieldStatus,
}

impl NormalizedField {
    pub fn new(
        raw_value: impl Into<String>,
        normalized_value: impl Into<String>,
        status: FieldStatus,
    ) -> Self {
        Self {
            raw_value: raw_value.into(),
            normalized_value: normalized_value.into(),
            status,
        }
    }

    /// Present and valid; this is what the completeness score counts.
    pub fn is_complete(&self) -> bool {
        !self.normalized_value.is_empty() && self.status.is_valid()
    }
}

// ============================================================================
// Records
// ============================================================================

/// One input row mapped onto the four logical field slots.
///
/// Absent columns and null cells are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawContact {
    pub source_row_index: usize,
    pub name: String,
    pub email: String,
    pub company: String,
    pub phone: String,
}

impl RawContact {
    pub fn new(source_row_index: usize) -> Self {
        Self {
            source_row_index,
            ..Self::default()
        }
    }

    /// Builder-style setter for a single field.
    pub fn with(mut self, kind: FieldKind, value: impl Into<String>) -> Self {
        self.set(kind, value.into());
        self
    }

    pub fn set(&mut self, kind: FieldKind, value: String) {
        match kind {
            FieldKind::Name => self.name = value,
            FieldKind::Email => self.email = value,
            FieldKind::Company => self.company = value,
            FieldKind::Phone => self.phone = value,
        }
    }
}

/// Overall quality flag of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Clean,
    Flagged,
}

/// A normalized and validated contact.
///
/// Created once by the record processor and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub name: NormalizedField,
    pub email: NormalizedField,
    pub company: NormalizedField,
    pub phone: NormalizedField,
    pub source_row_index: usize,
    pub completeness_score: u8,
    pub overall_status: RecordStatus,
}

impl ContactRecord {
    pub fn field(&self, kind: FieldKind) -> &NormalizedField {
        match kind {
            FieldKind::Name => &self.name,
            FieldKind::Email => &self.email,
            FieldKind::Company => &self.company,
            FieldKind::Phone => &self.phone,
        }
    }

    /// Fields in report order.
    pub fn fields(&self) -> impl Iterator<Item = (FieldKind, &NormalizedField)> {
        FieldKind::ALL.into_iter().map(move |kind| (kind, self.field(kind)))
    }

    /// Every invalid field of this record, in report order.
    pub fn issues(&self) -> Vec<FieldIssue> {
        self.fields()
            .filter_map(|(kind, field)| {
                field.status.reason().map(|reason| FieldIssue {
                    source_row_index: self.source_row_index,
                    field: kind,
                    reason,
                })
            })
            .collect()
    }

    /// The identity key used for deduplication, if any.
    pub fn identity_key(&self) -> Option<&str> {
        let email = self.email.normalized_value.as_str();
        (!email.is_empty()).then_some(email)
    }

    pub fn is_flagged(&self) -> bool {
        self.overall_status == RecordStatus::Flagged
    }
}

/// A single entry of the report's issue listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub source_row_index: usize,
    pub field: FieldKind,
    pub reason: ReasonCode,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {}: {} {}",
            self.source_row_index, self.field, self.reason
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
