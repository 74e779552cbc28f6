//! The export pipeline
//!
//! Copyright (c) 2025 Aktorz Team
//! Licensed under the Apache-2.0 license

use crate::document::{Document, DocumentBox, SCHEMA_VERSION_FIELD};
use crate::error::{Error, Result};
use crate::loader::input::value_kind;
use crate::registry::{Implementation, VersionRegistry};
use crate::validation::FieldStrictness;
use crate::versioning::{MigrationContext, VersionId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

/// Options for one export call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Re-stamp the exported document with the target version
    pub update_version: bool,
    /// Treatment of leftover fields the target type does not know
    pub field_strictness: FieldStrictness,
    /// Log a warning when exporting a document to its own version
    pub warn_on_identical: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            update_version: true,
            field_strictness: FieldStrictness::Ignore,
            warn_on_identical: true,
        }
    }
}

impl ExportOptions {
    /// Keep the source version instead of re-stamping
    pub fn keep_version(mut self) -> Self {
        self.update_version = false;
        self
    }

    pub fn with_field_strictness(mut self, strictness: FieldStrictness) -> Self {
        self.field_strictness = strictness;
        self
    }

    pub fn quiet(mut self) -> Self {
        self.warn_on_identical = false;
        self
    }
}

/// Exports typed documents into the shape of one resolved target version
#[derive(Debug, Clone)]
pub struct Exporter<'r> {
    registry: &'r VersionRegistry,
    implementation: &'r Implementation,
    requested: VersionId,
}

impl<'r> Exporter<'r> {
    /// Resolve the target implementation
    pub fn new(registry: &'r VersionRegistry, target: &VersionId) -> Result<Self> {
        let implementation = registry.resolve(target)?;
        debug!(
            requested = %target,
            implementation = %implementation.version(),
            "Exporter resolved implementation"
        );
        Ok(Self {
            registry,
            implementation,
            requested: target.clone(),
        })
    }

    /// Version of the resolved target implementation
    pub fn version(&self) -> &'r VersionId {
        self.implementation.version()
    }

    /// Target version as requested; exported documents are stamped with it
    pub fn requested(&self) -> &VersionId {
        &self.requested
    }

    pub fn implementation(&self) -> &'r Implementation {
        self.implementation
    }

    /// Export `document` as the target version's document type
    #[instrument(
        name = "export",
        skip_all,
        fields(source = %document.schema_version(), target = %self.requested)
    )]
    pub fn export(&self, document: &DocumentBox, options: &ExportOptions) -> Result<DocumentBox> {
        let hook = self.implementation.exporter_hook();
        let source = document.schema_version().clone();
        let target = self.implementation.version();

        if source == self.requested && options.warn_on_identical {
            warn!(
                version = %self.requested,
                "Exporting a document to its own version; this is never necessary"
            );
        }

        let context = MigrationContext::new(&source, target, self.registry.migrations());
        hook.check_version(&context)?;

        let projection = hook.projection(&source, target);
        let mut raw = match projection.apply(document.to_value()?) {
            Value::Object(raw) => raw,
            other => {
                return Err(Error::UnsupportedInputKind {
                    kind: value_kind(&other).to_string(),
                })
            }
        };
        raw.insert(SCHEMA_VERSION_FIELD.to_string(), Value::String(source.to_string()));
        debug!(restricted = !projection.is_unrestricted(), "Projected source document");

        let raw = hook.make_compatible(&context, raw)?;

        let document_type = self.implementation.document_type();
        let mut exported = document_type
            .materialize(&Value::Object(raw), options.field_strictness)
            .map_err(|violation| Error::SchemaViolation {
                version: target.clone(),
                document_type: document_type.short_name(),
                violation,
            })?;
        if options.update_version {
            hook.stamp(&mut exported, &self.requested);
        }
        debug!(version = %exported.schema_version(), "Exported document");

        Ok(exported)
    }

    /// Export a typed document and unwrap the result as `T`
    pub fn export_as<T: Document>(&self, document: impl Into<DocumentBox>, options: &ExportOptions) -> Result<T> {
        let exported = self.export(&document.into(), options)?;
        exported.downcast::<T>().map_err(|exported| Error::DocumentTypeMismatch {
            expected: std::any::type_name::<T>(),
            actual: exported.type_name(),
        })
    }
}
