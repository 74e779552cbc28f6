//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (YAML/JSON)
//! - Command-line arguments, which always take precedence

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use aktorz_schemas::{FieldStrictness, VersionId, VersionValidation};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Defaults for document commands
    pub defaults: DefaultsConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LogSettings,
}

/// Defaults applied when a command leaves an option unset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Version documents are loaded as (the current version when unset)
    pub version: Option<VersionId>,

    /// Declared-version check for `load`
    pub validation: VersionValidation,

    /// Re-stamp loaded and exported documents
    pub update_version: bool,

    /// Unknown-field handling for `load`
    pub field_strictness: FieldStrictness,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format (human, json, json-pretty, yaml)
    pub format: String,

    /// Use colored output by default
    pub color: bool,
}

/// Logging configuration read from the file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Log level filter used when no `-v` flag is given
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: Option<String>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            version: None,
            validation: VersionValidation::Readable,
            update_version: true,
            field_strictness: FieldStrictness::Strict,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "human".to_string(),
            color: true,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::config(path, e.to_string()))?;

        let config = if is_yaml(path) {
            serde_yaml::from_str(&content).map_err(|e| Error::config(path, e.to_string()))?
        } else {
            serde_json::from_str(&content).map_err(|e| Error::config(path, e.to_string()))?
        };

        debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Load configuration from the first default location that exists
    pub fn load() -> Result<Self> {
        match Self::default_config_paths().into_iter().find(|path| path.exists()) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        if let Some(path) = file {
            Self::from_file(path)
        } else {
            Self::load()
        }
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from("aktorz.yaml"),
            PathBuf::from(".aktorz.yaml"),
            PathBuf::from("aktorz.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let aktorz_dir = config_dir.join("aktorz");
            paths.push(aktorz_dir.join("config.yaml"));
            paths.push(aktorz_dir.join("config.json"));
        }

        paths
    }

    /// Output format, falling back to human output for unknown names
    pub fn output_format(&self) -> OutputFormat {
        match self.output.format.to_ascii_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "json-pretty" | "json_pretty" => OutputFormat::JsonPretty,
            "yaml" | "yml" => OutputFormat::Yaml,
            "human" => OutputFormat::Human,
            other => {
                warn!(format = other, "Unknown output format in configuration, using human");
                OutputFormat::Human
            }
        }
    }

    /// Version documents are loaded as when no flag names one
    pub fn default_version(&self) -> Result<VersionId> {
        match &self.defaults.version {
            Some(version) => Ok(version.clone()),
            None => Ok(VersionId::parse(aktorz_model::CURRENT_VERSION)?),
        }
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_config(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.defaults.validation, VersionValidation::Readable);
        assert!(config.defaults.update_version);
        assert_eq!(config.output_format(), OutputFormat::Human);
        assert_eq!(config.default_version().unwrap().to_string(), aktorz_model::CURRENT_VERSION);
    }

    #[test]
    fn test_yaml_file() {
        let file = write_config(
            ".yaml",
            "defaults:\n  version: v0.1.3\n  validation: identical\n  field_strictness: ignore\noutput:\n  format: yaml\nlogging:\n  level: debug\n",
        );
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.default_version().unwrap(), VersionId::new(0, 1, 3));
        assert_eq!(config.defaults.validation, VersionValidation::Identical);
        assert_eq!(config.defaults.field_strictness, FieldStrictness::Ignore);
        assert!(config.defaults.update_version);
        assert_eq!(config.output_format(), OutputFormat::Yaml);
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_json_file() {
        let file = write_config(".json", r#"{"defaults": {"update_version": false}}"#);
        let config = Config::from_file(file.path()).unwrap();
        assert!(!config.defaults.update_version);
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_bad_file_names_path() {
        let file = write_config(".json", "{not json");
        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }
}
