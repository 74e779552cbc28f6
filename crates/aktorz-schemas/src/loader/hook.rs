//! Per-version loader overrides
//!
//! Copyright (c) 2025 Aktorz Team
//! Licensed under the Apache-2.0 license

use crate::document::{DocumentBox, SCHEMA_VERSION_FIELD};
use crate::error::{Error, Result};
use crate::loader::input::{InputOrigin, LoaderInput};
use crate::loader::parser::DocumentParser;
use crate::versioning::{
    CompatibilityChecker, MigrationContext, RawDocument, VersionId, VersionValidation, DEFAULT_PREFIX,
};
use std::fmt;

/// Stages of the load pipeline a version may override.
///
/// An [`Implementation`](crate::registry::Implementation) registered with a
/// hook has every stage delegated to it; each method defaults to the generic
/// behavior, so a hook only overrides what differs for its version.
pub trait LoaderHook: Send + Sync + fmt::Debug {
    /// Normalize the raw input to a mapping
    fn read_input(&self, input: LoaderInput) -> Result<RawDocument> {
        DocumentParser::new().read(input)
    }

    /// Extract the declared version from the raw mapping
    fn declared_version(&self, raw: &RawDocument, origin: &InputOrigin) -> Result<VersionId> {
        declared_version(raw, origin)
    }

    /// Enforce the requested validation level
    fn check_version(
        &self,
        checker: &CompatibilityChecker<'_>,
        validation: VersionValidation,
        implementation: &VersionId,
        declared: &VersionId,
    ) -> Result<()> {
        check_version(checker, validation, implementation, declared)
    }

    /// Reshape data declared at another version into this version's shape.
    ///
    /// Only called when the declared version differs from the implementation
    /// version. The default applies the migration registered for exactly this
    /// pair and otherwise leaves the data unchanged.
    fn make_compatible(&self, context: &MigrationContext<'_>, data: RawDocument) -> Result<RawDocument> {
        context.apply(data)
    }

    /// Re-stamp a materialized document with `version`
    fn stamp(&self, document: &mut DocumentBox, version: &VersionId) {
        document.set_schema_version(version.clone());
    }
}

/// The generic loader behavior
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultLoaderHook;

impl LoaderHook for DefaultLoaderHook {}

/// Read `schema_version` from a raw mapping, coercing legacy structured values
pub fn declared_version(raw: &RawDocument, origin: &InputOrigin) -> Result<VersionId> {
    match raw.get(SCHEMA_VERSION_FIELD) {
        None | Some(serde_json::Value::Null) => Err(Error::MissingVersionField {
            field: SCHEMA_VERSION_FIELD.to_string(),
            origin: origin.clone(),
        }),
        Some(value) => VersionId::coerce(value, DEFAULT_PREFIX),
    }
}

/// Fail with [`Error::IncompatibleVersion`] unless `validation` holds
pub fn check_version(
    checker: &CompatibilityChecker<'_>,
    validation: VersionValidation,
    implementation: &VersionId,
    declared: &VersionId,
) -> Result<()> {
    if checker.satisfies(validation, implementation, declared) {
        Ok(())
    } else {
        Err(Error::IncompatibleVersion {
            declared: declared.clone(),
            implementation: implementation.clone(),
            validation,
        })
    }
}
