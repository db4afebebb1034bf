#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration for closers
//!
//! Release behaviour is configured from, in increasing priority:
//! - Default values (hard-coded)
//! - A TOML file
//! - Environment variables

use closers_errors::{ConfigError, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub release: ReleaseConfig,
}

/// Settings applied to resource groups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseConfig {
    /// Emit release failures that are not returned at warn level instead of debug
    #[serde(default = "default_report_suppressed")]
    pub report_suppressed: bool,
    /// Label recorded on release spans of groups that have none of their own
    #[serde(default)]
    pub label: Option<String>,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            report_suppressed: true,
            label: None,
        }
    }
}

fn default_report_suppressed() -> bool {
    true
}

impl Config {
    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or does not match the
    /// configuration schema.
    pub fn from_toml_str(contents: &str) -> Result<Self, Error> {
        toml::from_str(contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path).map_err(|_| ConfigError::NotFound {
            path: path.display().to_string(),
        })?;

        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(path = %path.display(), "loaded release configuration");
        Ok(config)
    }

    /// Load configuration from an optional path or use defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path),
            None => Ok(Self::default()),
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        self.merge_vars(|name| std::env::var(name).ok())
    }

    fn merge_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), Error> {
        // CLOSERS_REPORT_SUPPRESSED
        if let Some(report) = lookup("CLOSERS_REPORT_SUPPRESSED") {
            self.release.report_suppressed = match report.as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "CLOSERS_REPORT_SUPPRESSED".to_string(),
                        value: report,
                    }
                    .into())
                }
            };
        }

        // CLOSERS_GROUP_LABEL
        if let Some(label) = lookup("CLOSERS_GROUP_LABEL") {
            self.release.label = if label.is_empty() { None } else { Some(label) };
        }

        Ok(())
    }
}
