//! The load pipeline
//!
//! Copyright (c) 2025 Aktorz Team
//! Licensed under the Apache-2.0 license

use crate::document::{Document, DocumentBox, SCHEMA_VERSION_FIELD};
use crate::error::{Error, Result};
use crate::loader::input::LoaderInput;
use crate::registry::{Implementation, VersionRegistry};
use crate::validation::FieldStrictness;
use crate::versioning::{MigrationContext, VersionId, VersionValidation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::{debug, instrument};

/// Options for one load call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Declared-version check to enforce
    pub validation: VersionValidation,
    /// Re-stamp the loaded document with the requested version
    pub update_version: bool,
    /// Treatment of fields the document type does not know
    pub field_strictness: FieldStrictness,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            validation: VersionValidation::Readable,
            update_version: true,
            field_strictness: FieldStrictness::Strict,
        }
    }
}

impl LoadOptions {
    pub fn with_validation(mut self, validation: VersionValidation) -> Self {
        self.validation = validation;
        self
    }

    /// Keep the declared version instead of re-stamping
    pub fn keep_version(mut self) -> Self {
        self.update_version = false;
        self
    }

    pub fn with_field_strictness(mut self, strictness: FieldStrictness) -> Self {
        self.field_strictness = strictness;
        self
    }
}

/// Pipeline states, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoadStage {
    Resolved,
    Parsed,
    VersionChecked,
    Migrated,
    Materialized,
}

impl fmt::Display for LoadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Resolved => "resolved",
            Self::Parsed => "parsed",
            Self::VersionChecked => "version-checked",
            Self::Migrated => "migrated",
            Self::Materialized => "materialized",
        };
        f.write_str(name)
    }
}

/// Loads raw input as the document type of one resolved implementation.
///
/// Construction performs resolution; [`load`](Loader::load) runs the remaining
/// stages and either returns a complete document or fails without producing
/// anything.
///
/// ```no_run
/// use aktorz_schemas::{LoadOptions, Loader, RegistryBuilder, VersionId};
/// # fn registry() -> aktorz_schemas::VersionRegistry { RegistryBuilder::new().build() }
///
/// let registry = registry();
/// let loader = Loader::new(&registry, &VersionId::parse("v0.2.0")?)?;
/// let document = loader.load(std::path::Path::new("actors.json"), &LoadOptions::default())?;
/// println!("{}", document.to_json_string()?);
/// # Ok::<(), aktorz_schemas::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Loader<'r> {
    registry: &'r VersionRegistry,
    implementation: &'r Implementation,
    requested: VersionId,
}

impl<'r> Loader<'r> {
    /// Resolve the implementation for `version`
    pub fn new(registry: &'r VersionRegistry, version: &VersionId) -> Result<Self> {
        let implementation = registry.resolve(version)?;
        debug!(
            requested = %version,
            implementation = %implementation.version(),
            stage = %LoadStage::Resolved,
            "Loader resolved implementation"
        );
        Ok(Self {
            registry,
            implementation,
            requested: version.clone(),
        })
    }

    /// Version of the resolved implementation
    pub fn version(&self) -> &'r VersionId {
        self.implementation.version()
    }

    /// Version the loader was asked for; loaded documents are stamped with it
    pub fn requested(&self) -> &VersionId {
        &self.requested
    }

    pub fn implementation(&self) -> &'r Implementation {
        self.implementation
    }

    /// Run the pipeline on `input`
    #[instrument(
        name = "load",
        skip_all,
        fields(implementation = %self.implementation.version(), validation = %options.validation)
    )]
    pub fn load<I: Into<LoaderInput>>(&self, input: I, options: &LoadOptions) -> Result<DocumentBox> {
        let hook = self.implementation.loader_hook();
        let implementation_version = self.implementation.version();
        let input = input.into();
        let origin = input.origin();

        let mut raw = hook.read_input(input)?;
        debug!(stage = %LoadStage::Parsed, %origin, fields = raw.len());

        let declared = hook.declared_version(&raw, &origin)?;
        raw.insert(SCHEMA_VERSION_FIELD.to_string(), Value::String(declared.to_string()));
        hook.check_version(
            &self.registry.checker(),
            options.validation,
            implementation_version,
            &declared,
        )?;
        debug!(stage = %LoadStage::VersionChecked, %declared);

        let data = if declared == *implementation_version {
            raw
        } else {
            let context = MigrationContext::new(&declared, implementation_version, self.registry.migrations());
            hook.make_compatible(&context, raw)?
        };
        debug!(stage = %LoadStage::Migrated, migrated = declared != *implementation_version);

        let document_type = self.implementation.document_type();
        let mut document = document_type
            .materialize(&Value::Object(data), options.field_strictness)
            .map_err(|violation| Error::SchemaViolation {
                version: implementation_version.clone(),
                document_type: document_type.short_name(),
                violation,
            })?;
        if options.update_version {
            hook.stamp(&mut document, &self.requested);
        }
        debug!(stage = %LoadStage::Materialized, version = %document.schema_version());

        Ok(document)
    }

    /// Run the pipeline and unwrap the document as `T`
    pub fn load_as<T: Document, I: Into<LoaderInput>>(&self, input: I, options: &LoadOptions) -> Result<T> {
        let document = self.load(input, options)?;
        document.downcast::<T>().map_err(|document| Error::DocumentTypeMismatch {
            expected: std::any::type_name::<T>(),
            actual: document.type_name(),
        })
    }
}
