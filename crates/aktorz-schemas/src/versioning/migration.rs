//! Version-pair migrations
//!
//! A [`Migration`] reshapes raw document data declared at one version into the
//! shape of another. Migrations live in a [`MigrationTable`] keyed by the exact
//! `(source, target)` pair. The same table answers two questions: whether a
//! declared version is reachable by an implementation, and which function
//! reshapes it. A pair without an entry is never converted.
//!
//! Copyright (c) 2025 Aktorz Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::versioning::version::VersionId;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Raw document data as handed between pipeline stages
pub type RawDocument = Map<String, Value>;

/// A structural transformation between two specific versions
pub trait Migration: Send + Sync + fmt::Debug {
    /// Declared version of the data this migration accepts
    fn source(&self) -> VersionId;

    /// Version whose shape the migration produces
    fn target(&self) -> VersionId;

    /// Human-readable description used in logs
    fn description(&self) -> &str;

    /// Build the target-shaped data from `data`.
    ///
    /// The input is borrowed and must be left untouched. Structures the
    /// migration cannot reshape are reported as
    /// [`Error::UnsupportedMigrationShape`] instead of being dropped.
    fn migrate(&self, data: &RawDocument) -> Result<RawDocument>;
}

/// Per-call view of the versions involved in a load or export
#[derive(Debug, Clone, Copy)]
pub struct MigrationContext<'a> {
    /// Version the incoming data declares
    pub declared: &'a VersionId,
    /// Version of the implementation that will materialize the result
    pub target: &'a VersionId,
    /// Registered migration for exactly this pair, if any
    pub migration: Option<&'a dyn Migration>,
}

impl<'a> MigrationContext<'a> {
    pub fn new(declared: &'a VersionId, target: &'a VersionId, table: &'a MigrationTable) -> Self {
        Self {
            declared,
            target,
            migration: table.find(declared, target),
        }
    }

    /// Whether the data already declares the target version
    pub fn is_identity(&self) -> bool {
        self.declared == self.target
    }

    /// Apply the registered migration, or return the data unchanged when the
    /// pair has none.
    pub fn apply(&self, data: RawDocument) -> Result<RawDocument> {
        match self.migration {
            Some(migration) if !self.is_identity() => {
                tracing::info!(
                    source = %self.declared,
                    target = %self.target,
                    migration = migration.description(),
                    "Applying migration"
                );
                migration.migrate(&data)
            }
            _ => Ok(data),
        }
    }
}

/// Migrations keyed by `(source, target)`
#[derive(Debug, Clone, Default)]
pub struct MigrationTable {
    // Keyed by display strings so iteration order is stable for listings.
    migrations: BTreeMap<(String, String), Arc<dyn Migration>>,
}

impl MigrationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a migration. A second migration for the same pair is rejected.
    pub fn register(&mut self, migration: Arc<dyn Migration>) -> Result<()> {
        let key = Self::key(&migration.source(), &migration.target());
        if self.migrations.contains_key(&key) {
            return Err(Error::DuplicateMigration {
                source_version: migration.source(),
                target_version: migration.target(),
            });
        }
        tracing::debug!(
            source = %key.0,
            target = %key.1,
            "Registered migration: {}",
            migration.description()
        );
        self.migrations.insert(key, migration);
        Ok(())
    }

    /// The migration for exactly this pair
    pub fn find(&self, source: &VersionId, target: &VersionId) -> Option<&dyn Migration> {
        self.migrations
            .get(&Self::key(source, target))
            .map(|migration| migration.as_ref())
    }

    pub fn contains(&self, source: &VersionId, target: &VersionId) -> bool {
        self.find(source, target).is_some()
    }

    /// Registered `(source, target)` pairs in stable order
    pub fn pairs(&self) -> Vec<(VersionId, VersionId)> {
        self.migrations
            .values()
            .map(|migration| (migration.source(), migration.target()))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Migration> {
        self.migrations.values().map(|migration| migration.as_ref())
    }

    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }

    // Build metadata never distinguishes versions, so it is dropped from keys.
    fn key(source: &VersionId, target: &VersionId) -> (String, String) {
        (strip_build(source), strip_build(target))
    }
}

fn strip_build(version: &VersionId) -> String {
    match version.prerelease() {
        Some(pre) => format!("{}-{}", version.finalize(), pre),
        None => version.finalize().to_string(),
    }
}
