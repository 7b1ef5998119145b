//! Environment configuration helpers
//!
//! All runtime configuration comes from environment variables. Lookups go
//! through [`Env`] so callers can be exercised without touching the real
//! process environment.

use std::str::FromStr;

use thiserror::Error;

/// Configuration failure. Always fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is unset or blank
    #[error("missing required configuration: {0}")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed
    #[error("invalid configuration for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },

    /// No usable service-account credential
    #[error("credential error: {0}")]
    Credentials(String),
}

/// Variable lookup backed by a function
#[derive(Clone)]
pub struct Env<F = fn(&str) -> Option<String>> {
    lookup: F,
}

impl Env {
    /// Read from the process environment
    pub fn process() -> Self {
        Self {
            lookup: |name| std::env::var(name).ok(),
        }
    }
}

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    pub fn from_fn(lookup: F) -> Self {
        Self { lookup }
    }

    /// Value of `name`, treating blank values as unset
    pub fn optional(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    pub fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.optional(name).ok_or(ConfigError::Missing(name))
    }

    /// Parse `name` if set, otherwise fall back to `default`
    pub fn parsed_or<T>(&self, name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.optional(name) {
            Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
                name,
                reason: format!("'{raw}': {e}"),
            }),
            None => Ok(default),
        }
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
    fn test_required_present() {
        let env = env_of(&[("DRIVE_FOLDER_ID", "folder-123")]);
        assert_eq!(env.required("DRIVE_FOLDER_ID").unwrap(), "folder-123");
    }

    #[test]
    fn test_required_missing() {
        let env = env_of(&[]);
        let err = env.required("SHEETS_ID").unwrap_err();
        assert!(matches!(err, ConfigError::Missing("SHEETS_ID")));
        assert!(err.to_string().contains("SHEETS_ID"));
    }

    #[test]
    fn test_blank_counts_as_missing() {
        let env = env_of(&[("SHEETS_ID", "   ")]);
        assert!(env.optional("SHEETS_ID").is_none());
        assert!(env.required("SHEETS_ID").is_err());
    }

    #[test]
    fn test_values_are_trimmed() {
        let env = env_of(&[("DRIVE_FOLDER_ID", "  abc \n")]);
        assert_eq!(env.optional("DRIVE_FOLDER_ID").as_deref(), Some("abc"));
    }

    #[test]
    fn test_parsed_or_default() {
        let env = env_of(&[]);
        assert_eq!(env.parsed_or("PORT", 10000u16).unwrap(), 10000);
    }

    #[test]
    fn test_parsed_or_value() {
        let env = env_of(&[("PORT", "8080")]);
        assert_eq!(env.parsed_or("PORT", 10000u16).unwrap(), 8080);
    }

    #[test]
    fn test_parsed_or_invalid() {
        let env = env_of(&[("PORT", "not-a-port")]);
        let err = env.parsed_or("PORT", 10000u16).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));
        assert!(err.to_string().contains("not-a-port"));
    }
}
