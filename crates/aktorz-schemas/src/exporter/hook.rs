//! Per-version exporter overrides
//!
//! Copyright (c) 2025 Aktorz Team
//! Licensed under the Apache-2.0 license

use crate::document::DocumentBox;
use crate::error::{Error, Result};
use crate::exporter::projection::Projection;
use crate::versioning::{MigrationContext, RawDocument, VersionId};
use std::fmt;

/// Stages of the export pipeline a target version may override.
///
/// The hook belongs to the *target* implementation. In every method the
/// context's `declared` version is the source document's version and `target`
/// is the version being exported to.
pub trait ExporterHook: Send + Sync + fmt::Debug {
    /// Decide whether the source document may be written as the target
    fn check_version(&self, context: &MigrationContext<'_>) -> Result<()> {
        check_version(context)
    }

    /// Fields to keep or drop before reshaping
    fn projection(&self, _source: &VersionId, _target: &VersionId) -> Projection {
        Projection::all()
    }

    /// Restructure the projected data into the target shape
    fn make_compatible(&self, context: &MigrationContext<'_>, data: RawDocument) -> Result<RawDocument> {
        context.apply(data)
    }

    /// Re-stamp the exported document with `version`
    fn stamp(&self, document: &mut DocumentBox, version: &VersionId) {
        document.set_schema_version(version.clone());
    }
}

/// The generic exporter behavior
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultExporterHook;

impl ExporterHook for DefaultExporterHook {}

/// The source must be able to write the target shape, or a migration must be
/// registered for exactly this pair
pub fn check_version(context: &MigrationContext<'_>) -> Result<()> {
    if context.declared.can_write(context.target) || context.migration.is_some() {
        Ok(())
    } else {
        Err(Error::NotExportable {
            source_version: context.declared.clone(),
            target_version: context.target.clone(),
        })
    }
}
