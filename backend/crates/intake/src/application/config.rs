//! Application Configuration
//!
//! Configuration for the intake application layer.

use platform::config::{ConfigError, Env};

use crate::domain::value_objects::SubmissionLimits;

/// Multipart field carrying the image parts
pub const DEFAULT_FILES_FIELD: &str = "images";
/// Append target; a bare column range addresses the first sheet
pub const DEFAULT_SHEET_RANGE: &str = "A:G";

/// Intake application configuration
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    /// Drive folder receiving the uploads
    pub folder_id: String,
    /// Spreadsheet receiving one row per submission
    pub spreadsheet_id: String,
    /// A1 range the rows are appended to
    pub sheet_range: String,
    /// Multipart field name for files
    pub files_field: String,
    pub limits: SubmissionLimits,
}

impl IntakeConfig {
    pub fn new(folder_id: impl Into<String>, spreadsheet_id: impl Into<String>) -> Self {
        Self {
            folder_id: folder_id.into(),
            spreadsheet_id: spreadsheet_id.into(),
            sheet_range: DEFAULT_SHEET_RANGE.to_string(),
            files_field: DEFAULT_FILES_FIELD.to_string(),
            limits: SubmissionLimits::default(),
        }
    }

    /// Load from `DRIVE_FOLDER_ID`, `SHEETS_ID` (both required) and
    /// `SHEETS_RANGE` (optional)
    pub fn from_env<F>(env: &Env<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(env.required("DRIVE_FOLDER_ID")?, env.required("SHEETS_ID")?);
        if let Some(range) = env.optional("SHEETS_RANGE") {
            config.sheet_range = range;
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_limits(mut self, limits: SubmissionLimits) -> Self {
        self.limits = limits;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> Env<impl Fn(&str) -> Option<String>> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Env::from_fn(move |name| map.get(name).cloned())
    }

    #[test]
    fn test_from_env_defaults() {
        let env = env_of(&[("DRIVE_FOLDER_ID", "folder-1"), ("SHEETS_ID", "sheet-1")]);
        let config = IntakeConfig::from_env(&env).unwrap();

        assert_eq!(config.folder_id, "folder-1");
        assert_eq!(config.spreadsheet_id, "sheet-1");
        assert_eq!(config.sheet_range, "A:G");
        assert_eq!(config.files_field, "images");
        assert_eq!(config.limits.max_files, 10);
        assert_eq!(config.limits.max_total_bytes, 100 * 1024 * 1024);
    }

    #[test]
    fn test_from_env_custom_range() {
        let env = env_of(&[
            ("DRIVE_FOLDER_ID", "folder-1"),
            ("SHEETS_ID", "sheet-1"),
            ("SHEETS_RANGE", "Responses!A:G"),
        ]);
        let config = IntakeConfig::from_env(&env).unwrap();
        assert_eq!(config.sheet_range, "Responses!A:G");
    }

    #[test]
    fn test_missing_folder_is_fatal() {
        let env = env_of(&[("SHEETS_ID", "sheet-1")]);
        let err = IntakeConfig::from_env(&env).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DRIVE_FOLDER_ID")));
    }

    #[test]
    fn test_missing_spreadsheet_is_fatal() {
        let env = env_of(&[("DRIVE_FOLDER_ID", "folder-1")]);
        let err = IntakeConfig::from_env(&env).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("SHEETS_ID")));
    }
}
