//! Configuration types for the contact cleaning pipeline.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic pipeline setup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DEFAULT_OUTPUT_DIR: &str = "output";
const DEFAULT_OUTPUT_NAME: &str = "cleaned_contacts";
const DEFAULT_REPORT_NAME: &str = "cleaning_report";

/// Configuration for the contact cleaning pipeline.
///
/// Use [`CleanerConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use contact_cleaner::config::CleanerConfig;
///
/// let config = CleanerConfig::builder()
///     .output_dir("out")
///     .exclude_flagged(true)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanerConfig {
    /// Output directory for the cleaned dataset and reports.
    /// Default: "output"
    pub output_dir: PathBuf,

    /// Cleaned dataset file name (without extension).
    /// Default: "cleaned_contacts"
    pub output_name: String,

    /// Report file name (without extension), shared by the text and JSON reports.
    /// Default: "cleaning_report"
    pub report_name: String,

    /// Drop flagged survivors from the cleaned dataset.
    /// They are still counted and listed in the report.
    /// Default: false
    pub exclude_flagged: bool,

    /// Also write the report as JSON next to the text report.
    /// Default: false
    pub emit_json_report: bool,

    /// Whether to write the cleaned dataset and reports to disk.
    /// When false, results are kept in memory only.
    /// Default: true
    pub save_to_disk: bool,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            report_name: DEFAULT_REPORT_NAME.to_string(),
            exclude_flagged: false,
            emit_json_report: false,
            save_to_disk: true,
        }
    }
}

impl CleanerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleanerConfigBuilder {
        CleanerConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        validate_file_name("output_name", &self.output_name)?;
        validate_file_name("report_name", &self.report_name)
    }
}

fn validate_file_name(field: &str, value: &str) -> Result<(), ConfigValidationError> {
    if value.trim().is_empty() {
        return Err(ConfigValidationError::EmptyName(field.to_string()));
    }
    if value.contains(['/', '\\']) {
        return Err(ConfigValidationError::InvalidFileName {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("'{0}' must not be empty")]
    EmptyName(String),

    #[error("Invalid file name for '{field}': '{value}' (must not contain path separators)")]
    InvalidFileName { field: String, value: String },
}

/// Builder for [`CleanerConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleanerConfigBuilder {
    output_dir: Option<PathBuf>,
    output_name: Option<String>,
    report_name: Option<String>,
    exclude_flagged: Option<bool>,
    emit_json_report: Option<bool>,
    save_to_disk: Option<bool>,
}

impl CleanerConfigBuilder {
    /// Set the output directory for the cleaned dataset and reports.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Set the cleaned dataset file name (without extension).
    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    /// Set the report file name (without extension).
    pub fn report_name(mut self, name: impl Into<String>) -> Self {
        self.report_name = Some(name.into());
        self
    }

    /// Drop flagged records from the cleaned dataset.
    pub fn exclude_flagged(mut self, exclude: bool) -> Self {
        self.exclude_flagged = Some(exclude);
        self
    }

    /// Also write `<report_name>.json`.
    pub fn emit_json_report(mut self, emit: bool) -> Self {
        self.emit_json_report = Some(emit);
        self
    }

    /// Enable or disable saving results to disk.
    ///
    /// When false, the pipeline skips all file I/O and only returns the
    /// cleaned records and the report.
    pub fn save_to_disk(mut self, save: bool) -> Self {
        self.save_to_disk = Some(save);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `CleanerConfig` or an error if validation fails.
    pub fn build(self) -> Result<CleanerConfig, ConfigValidationError> {
        let config = CleanerConfig {
            output_dir: self
                .output_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            output_name: self
                .output_name
                .unwrap_or_else(|| DEFAULT_OUTPUT_NAME.to_string()),
            report_name: self
                .report_name
                .unwrap_or_else(|| DEFAULT_REPORT_NAME.to_string()),
            exclude_flagged: self.exclude_flagged.unwrap_or(false),
            emit_json_report: self.emit_json_report.unwrap_or(false),
            save_to_disk: self.save_to_disk.unwrap_or(true),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CleanerConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.output_name, "cleaned_contacts");
        assert_eq!(config.report_name, "cleaning_report");
        assert!(!config.exclude_flagged);
        assert!(!config.emit_json_report);
        assert!(config.save_to_disk);
    }

    #[test]
    fn test_builder_defaults_match_default() {
        let config = CleanerConfig::builder().build().unwrap();
        assert_eq!(config, CleanerConfig::default());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = CleanerConfig::builder()
            .output_dir("out")
            .output_name("contacts")
            .report_name("summary")
            .exclude_flagged(true)
            .emit_json_report(true)
            .save_to_disk(false)
            .build()
            .unwrap();

        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.output_name, "contacts");
        assert_eq!(config.report_name, "summary");
        assert!(config.exclude_flagged);
        assert!(config.emit_json_report);
        assert!(!config.save_to_disk);
    }

    #[test]
    fn test_validation_empty_name() {
        let result = CleanerConfig::builder().output_name("  ").build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::EmptyName(field) if field == "output_name"
        ));
    }

    #[test]
    fn test_validation_path_separator() {
        let result = CleanerConfig::builder().report_name("../report").build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidFileName { .. }
        ));
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "output_dir": "custom_output",
            "output_name": "people",
            "report_name": "people_report",
            "exclude_flagged": true,
            "emit_json_report": true,
            "save_to_disk": false
        }"#;

        let config: CleanerConfig = serde_json::from_str(json).expect("Should deserialize");
        assert_eq!(config.output_dir.to_str().unwrap(), "custom_output");
        assert_eq!(config.output_name, "people");
        assert!(config.exclude_flagged);
        assert!(config.validate().is_ok());
    }
}
