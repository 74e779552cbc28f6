//! Version to implementation resolution
//!
//! A [`VersionRegistry`] is assembled once through [`RegistryBuilder`] and is
//! read-only afterwards: it exposes no mutating methods, so it can be shared
//! between threads freely. Alongside the implementations it holds the
//! supported-version allow-list and the [`MigrationTable`].
//!
//! Copyright (c) 2025 Aktorz Team
//! Licensed under the Apache-2.0 license

pub mod implementation;

pub use implementation::Implementation;

use crate::error::{Error, Result};
use crate::exporter::Exporter;
use crate::loader::Loader;
use crate::versioning::{CompatibilityChecker, Migration, MigrationTable, VersionId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Collects implementations, migrations and the supported allow-list
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    supported: Vec<VersionId>,
    implementations: Vec<Implementation>,
    migrations: MigrationTable,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare supported versions, in release order
    pub fn support<I: IntoIterator<Item = VersionId>>(mut self, versions: I) -> Self {
        self.supported.extend(versions);
        self
    }

    /// Register an implementation. A second implementation of an equal
    /// version is a fatal configuration error.
    pub fn register(mut self, implementation: Implementation) -> Result<Self> {
        if self
            .implementations
            .iter()
            .any(|existing| existing.version() == implementation.version())
        {
            return Err(Error::DuplicateImplementation {
                version: implementation.version().clone(),
            });
        }
        self.implementations.push(implementation);
        Ok(self)
    }

    /// Register a migration for its `(source, target)` pair
    pub fn migration<M: Migration + 'static>(mut self, migration: M) -> Result<Self> {
        self.migrations.register(Arc::new(migration))?;
        Ok(self)
    }

    pub fn build(self) -> VersionRegistry {
        let index = self
            .implementations
            .iter()
            .enumerate()
            .map(|(position, implementation)| (implementation.version().clone(), position))
            .collect();
        debug!(
            supported = self.supported.len(),
            implementations = self.implementations.len(),
            migrations = self.migrations.len(),
            "Built version registry"
        );
        VersionRegistry {
            supported: self.supported,
            implementations: self.implementations,
            index,
            migrations: self.migrations,
        }
    }
}

/// Immutable mapping from versions to implementations
#[derive(Debug, Clone)]
pub struct VersionRegistry {
    supported: Vec<VersionId>,
    implementations: Vec<Implementation>,
    index: HashMap<VersionId, usize>,
    migrations: MigrationTable,
}

impl VersionRegistry {
    /// Look up the implementation for `version`, falling back to its
    /// finalized form (pre-release and build stripped)
    pub fn resolve(&self, version: &VersionId) -> Result<&Implementation> {
        if let Some(implementation) = self.get(version) {
            return Ok(implementation);
        }
        let finalized = version.finalize();
        match self.get(&finalized) {
            Some(implementation) => {
                debug!(requested = %version, resolved = %finalized, "Resolved through finalized version");
                Ok(implementation)
            }
            None => Err(Error::UnresolvedVersion {
                version: version.clone(),
                finalized,
            }),
        }
    }

    /// The implementation registered for exactly `version`
    pub fn get(&self, version: &VersionId) -> Option<&Implementation> {
        self.index
            .get(version)
            .map(|&position| &self.implementations[position])
    }

    /// Supported versions in declaration order
    pub fn supported(&self) -> &[VersionId] {
        &self.supported
    }

    /// The last declared supported version
    pub fn current_version(&self) -> Option<&VersionId> {
        self.supported.last()
    }

    /// Implementations in registration order
    pub fn implementations(&self) -> impl Iterator<Item = &Implementation> {
        self.implementations.iter()
    }

    pub fn migrations(&self) -> &MigrationTable {
        &self.migrations
    }

    pub fn checker(&self) -> CompatibilityChecker<'_> {
        CompatibilityChecker::new(&self.migrations)
    }

    /// A loader for `version`
    pub fn loader(&self, version: &VersionId) -> Result<Loader<'_>> {
        Loader::new(self, version)
    }

    /// An exporter targeting `version`
    pub fn exporter(&self, version: &VersionId) -> Result<Exporter<'_>> {
        Exporter::new(self, version)
    }

    /// Check that the allow-list and the implementations correspond one to one.
    ///
    /// Every supported version must resolve to an implementation, and every
    /// implementation must be the resolution of at least one supported version.
    pub fn verify_completeness(&self) -> Result<()> {
        let mut unimplemented = Vec::new();
        let mut used = vec![false; self.implementations.len()];

        for version in &self.supported {
            match self.resolve(version) {
                Ok(implementation) => {
                    if let Some(&position) = self.index.get(implementation.version()) {
                        used[position] = true;
                    }
                }
                Err(_) => unimplemented.push(version.clone()),
            }
        }

        let orphaned: Vec<VersionId> = self
            .implementations
            .iter()
            .zip(&used)
            .filter(|(_, used)| !**used)
            .map(|(implementation, _)| implementation.version().clone())
            .collect();

        if unimplemented.is_empty() && orphaned.is_empty() {
            Ok(())
        } else {
            Err(Error::IncompleteRegistry {
                unimplemented,
                orphaned,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Doc {
        schema_version: VersionId,
    }

    impl Document for Doc {
        fn schema_version(&self) -> &VersionId {
            &self.schema_version
        }

        fn set_schema_version(&mut self, version: VersionId) {
            self.schema_version = version;
        }
    }

    fn v(text: &str) -> VersionId {
        VersionId::parse(text).unwrap()
    }

    fn registry(supported: &[&str], implemented: &[&str]) -> VersionRegistry {
        let mut builder = RegistryBuilder::new().support(supported.iter().map(|s| v(s)));
        for version in implemented {
            builder = builder.register(Implementation::new::<Doc>(v(version))).unwrap();
        }
        builder.build()
    }

    #[test]
    fn test_resolve_exact_then_finalized() {
        let registry = registry(&["v0.2.0-rc2"], &["v0.2.0"]);
        assert_eq!(registry.resolve(&v("v0.2.0")).unwrap().version(), &v("v0.2.0"));
        assert_eq!(registry.resolve(&v("v0.2.0-rc2")).unwrap().version(), &v("v0.2.0"));
        assert_eq!(registry.resolve(&v("v0.2.0+build.1")).unwrap().version(), &v("v0.2.0"));

        match registry.resolve(&v("v0.3.0-rc1")) {
            Err(Error::UnresolvedVersion { version, finalized }) => {
                assert_eq!(version, v("v0.3.0-rc1"));
                assert_eq!(finalized, v("v0.3.0"));
            }
            other => panic!("expected UnresolvedVersion, got {other:?}"),
        }
    }

    #[test]
    fn test_exact_prerelease_entry_wins() {
        let registry = registry(&["v0.2.0-rc1", "v0.2.0"], &["v0.2.0-rc1", "v0.2.0"]);
        assert_eq!(registry.resolve(&v("v0.2.0-rc1")).unwrap().version(), &v("v0.2.0-rc1"));
        assert_eq!(registry.resolve(&v("v0.2.0-rc2")).unwrap().version(), &v("v0.2.0"));
    }

    #[test]
    fn test_duplicate_registration_is_fatal() {
        let err = RegistryBuilder::new()
            .register(Implementation::new::<Doc>(v("v1.0.0")))
            .unwrap()
            .register(Implementation::new::<Doc>(v("v1.0.0+other")))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateImplementation { .. }));
    }

    #[test]
    fn test_completeness() {
        assert!(registry(&["v0.1.0", "v0.2.0-rc1"], &["v0.1.0", "v0.2.0"])
            .verify_completeness()
            .is_ok());

        match registry(&["v0.1.0", "v0.3.0"], &["v0.1.0", "v0.2.0"]).verify_completeness() {
            Err(Error::IncompleteRegistry {
                unimplemented,
                orphaned,
            }) => {
                assert_eq!(unimplemented, vec![v("v0.3.0")]);
                assert_eq!(orphaned, vec![v("v0.2.0")]);
            }
            other => panic!("expected IncompleteRegistry, got {other:?}"),
        }
    }

    #[test]
    fn test_default_hooks() {
        let registry = registry(&["v1.0.0"], &["v1.0.0"]);
        let implementation = registry.resolve(&v("v1.0.0")).unwrap();
        assert!(!implementation.has_loader_hook());
        assert!(!implementation.has_exporter_hook());
        assert!(implementation.document_type().is::<Doc>());
        assert_eq!(registry.current_version(), Some(&v("v1.0.0")));
    }

    #[test]
    fn test_registry_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<VersionRegistry>();
        assert_send_sync::<Implementation>();
    }
}
