//! Error types for versioned document operations
//!
//! Every stage of the load and export pipelines fails fast with one of these
//! variants. Each carries the structured context needed to act on it (both
//! versions, the validation level, failing field paths, the input origin) so a
//! caller never has to re-parse the input to explain a failure.
//!
//! Copyright (c) 2025 Aktorz Team
//! Licensed under the Apache-2.0 license

use crate::loader::input::InputOrigin;
use crate::loader::parser::Format;
use crate::validation::SchemaViolation;
use crate::versioning::{VersionId, VersionValidation};
use std::path::PathBuf;
use thiserror::Error;

/// Result type for versioned document operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by version parsing, registry resolution, loading, exporting
/// and migration
#[derive(Error, Debug)]
pub enum Error {
    /// Version text is not `<prefix><semver>`
    #[error("Malformed version '{input}': {reason}")]
    MalformedVersion { input: String, reason: String },

    /// No implementation for the version, even after finalize fallback
    #[error("No implementation registered for version '{version}' (also tried '{finalized}')")]
    UnresolvedVersion {
        version: VersionId,
        finalized: VersionId,
    },

    /// Loader input is not something that normalizes to a mapping
    #[error("Unsupported loader input: expected a path, text or mapping but got {kind}")]
    UnsupportedInputKind { kind: String },

    /// Input file is missing or unreadable
    #[error("Failed to read input '{path}': {source}")]
    InputUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input text is not valid JSON or YAML
    #[error("Failed to parse {format} input from {origin}: {reason}")]
    MalformedInput {
        origin: InputOrigin,
        format: Format,
        reason: String,
    },

    /// Parsed mapping has no declared version
    #[error("Input from {origin} has no '{field}' field")]
    MissingVersionField { field: String, origin: InputOrigin },

    /// Declared version fails the requested check
    #[error(
        "Declared version '{declared}' fails {validation} validation against implementation '{implementation}'"
    )]
    IncompatibleVersion {
        declared: VersionId,
        implementation: VersionId,
        validation: VersionValidation,
    },

    /// Materialization failed field-level constraints
    #[error("Document does not match {document_type} ({version}): {violation}")]
    SchemaViolation {
        version: VersionId,
        document_type: &'static str,
        violation: SchemaViolation,
    },

    /// The materialized document is not the requested Rust type
    #[error("Expected document type {expected} but the implementation produces {actual}")]
    DocumentTypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// Source document cannot be written in the target shape
    #[error("A '{source_version}' document cannot be exported as '{target_version}'")]
    NotExportable {
        source_version: VersionId,
        target_version: VersionId,
    },

    /// A migration met a structure it cannot reshape safely
    #[error("Migration {source_version} -> {target_version} cannot reshape '{path}': {reason}")]
    UnsupportedMigrationShape {
        source_version: VersionId,
        target_version: VersionId,
        path: String,
        reason: String,
    },

    /// A second implementation was registered for one version
    #[error("Duplicate implementation registered for version '{version}'")]
    DuplicateImplementation { version: VersionId },

    /// A second migration was registered for one version pair
    #[error("Duplicate migration registered for '{source_version}' -> '{target_version}'")]
    DuplicateMigration {
        source_version: VersionId,
        target_version: VersionId,
    },

    /// Supported versions and registered implementations disagree
    #[error(
        "Registry is incomplete: unimplemented supported versions [{}], implementations of unsupported versions [{}]",
        join(.unimplemented),
        join(.orphaned)
    )]
    IncompleteRegistry {
        unimplemented: Vec<VersionId>,
        orphaned: Vec<VersionId>,
    },

    /// JSON conversion of a materialized document failed
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

fn join(versions: &[VersionId]) -> String {
    versions
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    /// Create a malformed version error
    pub fn malformed_version<I: Into<String>, R: Into<String>>(input: I, reason: R) -> Self {
        Self::MalformedVersion {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create an input unavailable error with path context
    pub fn input_unavailable(path: PathBuf, source: std::io::Error) -> Self {
        Self::InputUnavailable { path, source }
    }

    /// Create an unsupported migration shape error
    pub fn unsupported_shape<P: Into<String>, R: Into<String>>(
        source_version: VersionId,
        target_version: VersionId,
        path: P,
        reason: R,
    ) -> Self {
        Self::UnsupportedMigrationShape {
            source_version,
            target_version,
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a JSON conversion error
    pub fn json<M: Into<String>>(message: M, source: serde_json::Error) -> Self {
        Self::Json {
            message: message.into(),
            source,
        }
    }

    /// The pair of versions involved, if the error concerns two versions.
    ///
    /// The first element is the data's version and the second the
    /// implementation or target version.
    pub fn versions(&self) -> Option<(&VersionId, &VersionId)> {
        match self {
            Self::IncompatibleVersion {
                declared,
                implementation,
                ..
            } => Some((declared, implementation)),
            Self::NotExportable {
                source_version,
                target_version,
            }
            | Self::UnsupportedMigrationShape {
                source_version,
                target_version,
                ..
            }
            | Self::DuplicateMigration {
                source_version,
                target_version,
            } => Some((source_version, target_version)),
            _ => None,
        }
    }

    /// Field violations, for [`Error::SchemaViolation`]
    pub fn violation(&self) -> Option<&SchemaViolation> {
        match self {
            Self::SchemaViolation { violation, .. } => Some(violation),
            _ => None,
        }
    }

    /// Whether the error stems from what the caller passed in rather than from
    /// registry configuration or stored data
    pub fn is_caller_defect(&self) -> bool {
        matches!(
            self,
            Self::MalformedVersion { .. }
                | Self::UnsupportedInputKind { .. }
                | Self::InputUnavailable { .. }
                | Self::MalformedInput { .. }
                | Self::UnresolvedVersion { .. }
                | Self::NotExportable { .. }
                | Self::DocumentTypeMismatch { .. }
        )
    }

    /// Whether the error is a registry configuration defect
    pub fn is_configuration_defect(&self) -> bool {
        matches!(
            self,
            Self::DuplicateImplementation { .. }
                | Self::DuplicateMigration { .. }
                | Self::IncompleteRegistry { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::FieldViolation;

    fn v(text: &str) -> VersionId {
        VersionId::parse(text).unwrap()
    }

    #[test]
    fn test_incompatible_version_context() {
        let err = Error::IncompatibleVersion {
            declared: v("v0.1.0"),
            implementation: v("v0.2.0"),
            validation: VersionValidation::Readable,
        };
        assert_eq!(
            err.to_string(),
            "Declared version 'v0.1.0' fails readable validation against implementation 'v0.2.0'"
        );
        assert_eq!(err.versions(), Some((&v("v0.1.0"), &v("v0.2.0"))));
        assert!(!err.is_caller_defect());
    }

    #[test]
    fn test_schema_violation_lists_fields() {
        let err = Error::SchemaViolation {
            version: v("v0.1.1"),
            document_type: "Model",
            violation: SchemaViolation::from(vec![
                FieldViolation::new("$.a", "min", "too small"),
                FieldViolation::new("$.b", "unknown_field", "not allowed"),
            ]),
        };
        let text = err.to_string();
        assert!(text.contains("$.a: too small"));
        assert!(text.contains("$.b: not allowed"));
        assert_eq!(err.violation().map(SchemaViolation::len), Some(2));
    }

    #[test]
    fn test_incomplete_registry_message() {
        let err = Error::IncompleteRegistry {
            unimplemented: vec![v("v0.3.0")],
            orphaned: vec![v("v0.0.1"), v("v0.0.2")],
        };
        assert!(err.to_string().contains("[v0.3.0]"));
        assert!(err.to_string().contains("[v0.0.1, v0.0.2]"));
        assert!(err.is_configuration_defect());
    }

    #[test]
    fn test_input_unavailable() {
        let err = Error::input_unavailable(
            PathBuf::from("missing.json"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "File not found"),
        );
        assert!(err.is_caller_defect());
        assert!(err.to_string().contains("missing.json"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
