//! Custom error types for the contact cleaning pipeline.
//!
//! Only structural failures are errors. Field-level defects (an empty name,
//! a malformed email) are recorded on the record itself and never surface
//! here.
//!
//! Errors are serializable so a caller can forward them as `{code, message}`
//! JSON, the same shape the `--json` CLI output uses.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the cleaning pipeline.
#[derive(Error, Debug)]
pub enum CleaningError {
    /// Input file does not exist.
    #[error("Contacts file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// None of the expected columns (name, email, company, phone) is present.
    #[error("No recognised contact columns in input (found: {found:?})")]
    NoRecognizedColumns { found: Vec<String> },

    /// Row indices supplied by the input layer are not strictly increasing.
    #[error("Row index contract violated: index {index} follows {previous}")]
    RowIndexContract { previous: usize, index: usize },

    /// Writing the cleaned dataset or the report failed.
    #[error("Failed to generate report: {0}")]
    ReportGenerationFailed(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CleaningError>,
    },
}

impl CleaningError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CleaningError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code for callers that branch on the failure kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InputNotFound(_) => "INPUT_NOT_FOUND",
            Self::NoRecognizedColumns { .. } => "NO_RECOGNIZED_COLUMNS",
            Self::RowIndexContract { .. } => "ROW_INDEX_CONTRACT",
            Self::ReportGenerationFailed(_) => "REPORT_GENERATION_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether the input itself is unusable (as opposed to an output or
    /// internal failure).
    pub fn is_structural(&self) -> bool {
        match self {
            Self::InputNotFound(_) | Self::NoRecognizedColumns { .. } | Self::Polars(_) => true,
            Self::WithContext { source, .. } => source.is_structural(),
            _ => false,
        }
    }
}

impl Serialize for CleaningError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("CleaningError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, CleaningError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CleaningError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CleaningError::Io(e).with_context(context))
    }
}
