//! Input parsing for YAML and JSON documents
//!
//! Copyright (c) 2025 Aktorz Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::loader::input::{value_kind, InputOrigin, LoaderInput};
use crate::versioning::RawDocument;
use serde_json::Value;
use std::fmt;
use std::path::Path;

/// Supported text formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// YAML format (.yaml, .yml)
    Yaml,
    /// JSON format (.json)
    Json,
}

impl Format {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension().and_then(|ext| ext.to_str())?;
        match extension.to_lowercase().as_str() {
            "yaml" | "yml" => Some(Format::Yaml),
            "json" => Some(Format::Json),
            _ => None,
        }
    }

    /// Guess the format of a text buffer. JSON documents are objects, so
    /// anything that does not open with `{` is read as YAML.
    pub fn sniff(content: &str) -> Self {
        if content.trim_start().starts_with('{') {
            Format::Json
        } else {
            Format::Yaml
        }
    }

    /// Get the primary file extension for this format
    pub fn primary_extension(&self) -> &'static str {
        match self {
            Format::Yaml => "yaml",
            Format::Json => "json",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Yaml => write!(f, "YAML"),
            Format::Json => write!(f, "JSON"),
        }
    }
}

/// Normalizes every [`LoaderInput`] kind to a raw mapping
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentParser;

impl DocumentParser {
    pub fn new() -> Self {
        Self
    }

    /// Read and parse any input kind into a mapping
    pub fn read(&self, input: LoaderInput) -> Result<RawDocument> {
        let origin = input.origin();
        match input {
            LoaderInput::Path(path) => self.parse_file(&path),
            LoaderInput::Text(text) => {
                let format = Format::sniff(&text);
                self.parse_content(&text, format, &origin)
            }
            LoaderInput::Mapping(mapping) => Ok(mapping),
            LoaderInput::Value(value) => into_mapping(value),
        }
    }

    /// Parse a file, detecting format from its extension and falling back to
    /// the content when the extension is not recognised
    pub fn parse_file(&self, path: &Path) -> Result<RawDocument> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::input_unavailable(path.to_path_buf(), e))?;
        let format = Format::from_path(path).unwrap_or_else(|| Format::sniff(&content));
        self.parse_content(&content, format, &InputOrigin::Path(path.to_path_buf()))
    }

    /// Parse content with explicit format
    pub fn parse_content(&self, content: &str, format: Format, origin: &InputOrigin) -> Result<RawDocument> {
        let value = match format {
            Format::Yaml => self.parse_yaml(content, origin)?,
            Format::Json => self.parse_json(content, origin)?,
        };
        into_mapping(value)
    }

    /// Parse YAML content
    pub fn parse_yaml(&self, content: &str, origin: &InputOrigin) -> Result<Value> {
        let malformed = |reason: String| Error::MalformedInput {
            origin: origin.clone(),
            format: Format::Yaml,
            reason,
        };

        // First parse as YAML Value to catch YAML-specific errors
        let yaml_value: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| malformed(e.to_string()))?;

        // Convert to JSON Value for consistent handling
        serde_json::to_value(yaml_value).map_err(|e| malformed(e.to_string()))
    }

    /// Parse JSON content
    pub fn parse_json(&self, content: &str, origin: &InputOrigin) -> Result<Value> {
        serde_json::from_str(content).map_err(|e| Error::MalformedInput {
            origin: origin.clone(),
            format: Format::Json,
            reason: e.to_string(),
        })
    }

    /// Serialize a value back to string format
    pub fn serialize(&self, value: &Value, format: Format) -> Result<String> {
        match format {
            Format::Json => serde_json::to_string_pretty(value)
                .map_err(|e| Error::json("Failed to serialize JSON", e)),
            Format::Yaml => serde_yaml::to_string(value).map_err(|e| Error::MalformedInput {
                origin: InputOrigin::Mapping,
                format: Format::Yaml,
                reason: e.to_string(),
            }),
        }
    }
}

fn into_mapping(value: Value) -> Result<RawDocument> {
    match value {
        Value::Object(mapping) => Ok(mapping),
        other => Err(Error::UnsupportedInputKind {
            kind: value_kind(&other).to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_path(Path::new("a.JSON")), Some(Format::Json));
        assert_eq!(Format::from_path(Path::new("a.yml")), Some(Format::Yaml));
        assert_eq!(Format::from_path(Path::new("a.txt")), None);
        assert_eq!(Format::sniff("  {\"a\": 1}"), Format::Json);
        assert_eq!(Format::sniff("a: 1"), Format::Yaml);
    }

    #[test]
    fn test_text_json_and_yaml_agree() {
        let parser = DocumentParser::new();
        let from_json = parser.read(LoaderInput::from(r#"{"schema_version": "v0.1.0", "actors": {}}"#)).unwrap();
        let from_yaml = parser.read(LoaderInput::from("schema_version: v0.1.0\nactors: {}\n")).unwrap();
        assert_eq!(from_json, from_yaml);
    }

    #[test]
    fn test_file_with_unknown_extension_is_sniffed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("document.data");
        fs::write(&path, r#"{"schema_version": "v0.1.0"}"#).unwrap();

        let mapping = DocumentParser::new().parse_file(&path).unwrap();
        assert_eq!(mapping.get("schema_version"), Some(&json!("v0.1.0")));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = DocumentParser::new()
            .read(LoaderInput::from(dir.path().join("nope.json")))
            .unwrap_err();
        assert!(matches!(err, Error::InputUnavailable { .. }));
    }

    #[test]
    fn test_non_mapping_inputs() {
        let parser = DocumentParser::new();
        for input in [
            LoaderInput::from(json!([1, 2])),
            LoaderInput::from(json!("v0.1.0")),
            LoaderInput::from("[1, 2]"),
            LoaderInput::from("just a string"),
        ] {
            let err = parser.read(input).unwrap_err();
            assert!(matches!(err, Error::UnsupportedInputKind { .. }), "{err:?}");
        }
    }

    #[test]
    fn test_malformed_text() {
        let err = DocumentParser::new().read(LoaderInput::from("{not json")).unwrap_err();
        assert!(matches!(err, Error::MalformedInput { format: Format::Json, .. }));
    }
}
