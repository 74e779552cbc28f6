//! Loader input kinds
//!
//! Copyright (c) 2025 Aktorz Team
//! Licensed under the Apache-2.0 license

use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};

/// Raw input accepted by the loader.
///
/// All variants normalize to a mapping. Equivalent content produces the same
/// document whichever variant carries it.
#[derive(Debug, Clone, PartialEq)]
pub enum LoaderInput {
    /// A UTF-8 JSON or YAML file
    Path(PathBuf),
    /// A UTF-8 JSON or YAML text buffer
    Text(String),
    /// An already-parsed mapping
    Mapping(Map<String, Value>),
    /// An arbitrary JSON value; only objects are accepted
    Value(Value),
}

impl LoaderInput {
    /// Where the input came from, for error context
    pub fn origin(&self) -> InputOrigin {
        match self {
            Self::Path(path) => InputOrigin::Path(path.clone()),
            Self::Text(_) => InputOrigin::Text,
            Self::Mapping(_) | Self::Value(_) => InputOrigin::Mapping,
        }
    }
}

impl From<PathBuf> for LoaderInput {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for LoaderInput {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<String> for LoaderInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for LoaderInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Map<String, Value>> for LoaderInput {
    fn from(mapping: Map<String, Value>) -> Self {
        Self::Mapping(mapping)
    }
}

impl From<Value> for LoaderInput {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// Origin of a loader input, carried by errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOrigin {
    Path(PathBuf),
    Text,
    Mapping,
}

impl fmt::Display for InputOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "'{}'", path.display()),
            Self::Text => write!(f, "text input"),
            Self::Mapping => write!(f, "mapping input"),
        }
    }
}

/// Name of a JSON value's kind, used in `UnsupportedInputKind` errors
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
