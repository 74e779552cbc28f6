//! Version compatibility checking
//!
//! Copyright (c) 2025 Aktorz Team
//! Licensed under the Apache-2.0 license

use crate::versioning::migration::MigrationTable;
use crate::versioning::version::VersionId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strictness of the declared-version check performed by the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionValidation {
    /// Skip the check entirely
    None,
    /// The implementation must be able to read the declared version
    #[default]
    Readable,
    /// The implementation must be able to write the declared version
    Writable,
    /// The declared version must equal the implementation version
    Identical,
}

impl VersionValidation {
    pub const ALL: [VersionValidation; 4] = [Self::None, Self::Readable, Self::Writable, Self::Identical];
}

impl fmt::Display for VersionValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Readable => "readable",
            Self::Writable => "writable",
            Self::Identical => "identical",
        };
        f.write_str(name)
    }
}

impl FromStr for VersionValidation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "readable" | "read" => Ok(Self::Readable),
            "writable" | "write" => Ok(Self::Writable),
            "identical" | "exact" => Ok(Self::Identical),
            other => Err(format!(
                "unknown version validation '{other}', expected one of: none, readable, writable, identical"
            )),
        }
    }
}

/// Decides whether an implementation accepts data declared at another version.
///
/// The native [`VersionId::can_read`] and [`VersionId::can_write`] predicates
/// are widened by the migration table: a pair with a registered migration is
/// readable and writable as well, which makes a breaking migration reachable for
/// exactly the pair it was written for.
#[derive(Debug, Clone, Copy)]
pub struct CompatibilityChecker<'a> {
    migrations: &'a MigrationTable,
}

impl<'a> CompatibilityChecker<'a> {
    pub fn new(migrations: &'a MigrationTable) -> Self {
        Self { migrations }
    }

    /// Whether `implementation` can read data declared as `declared`
    pub fn can_read(&self, implementation: &VersionId, declared: &VersionId) -> bool {
        implementation.can_read(declared) || self.migrations.contains(declared, implementation)
    }

    /// Whether `implementation` can write data declared as `declared`
    pub fn can_write(&self, implementation: &VersionId, declared: &VersionId) -> bool {
        implementation.can_write(declared) || self.migrations.contains(declared, implementation)
    }

    /// Apply one validation level
    pub fn satisfies(
        &self,
        validation: VersionValidation,
        implementation: &VersionId,
        declared: &VersionId,
    ) -> bool {
        match validation {
            VersionValidation::None => true,
            VersionValidation::Readable => self.can_read(implementation, declared),
            VersionValidation::Writable => self.can_write(implementation, declared),
            VersionValidation::Identical => implementation == declared,
        }
    }

    /// Outcome of every validation level, in [`VersionValidation::ALL`] order
    pub fn report(&self, implementation: &VersionId, declared: &VersionId) -> Vec<(VersionValidation, bool)> {
        VersionValidation::ALL
            .iter()
            .map(|&level| (level, self.satisfies(level, implementation, declared)))
            .collect()
    }

    /// Whether moving between the two versions crosses a compatibility
    /// boundary: a major change, or a minor change while major is zero.
    pub fn is_breaking_change(from: &VersionId, to: &VersionId) -> bool {
        !from.can_read(to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::versioning::migration::{Migration, RawDocument};
    use std::sync::Arc;

    #[derive(Debug)]
    struct Bridge;

    impl Migration for Bridge {
        fn source(&self) -> VersionId {
            VersionId::parse("v0.1.3").unwrap()
        }

        fn target(&self) -> VersionId {
            VersionId::parse("v0.2.0").unwrap()
        }

        fn description(&self) -> &str {
            "bridge"
        }

        fn migrate(&self, data: &RawDocument) -> crate::Result<RawDocument> {
            Ok(data.clone())
        }
    }

    fn v(text: &str) -> VersionId {
        VersionId::parse(text).unwrap()
    }

    #[test]
    fn test_native_levels() {
        let table = MigrationTable::new();
        let checker = CompatibilityChecker::new(&table);
        let implementation = v("v1.2.3");

        assert!(checker.satisfies(VersionValidation::None, &implementation, &v("x9.9.9")));
        assert!(checker.satisfies(VersionValidation::Readable, &implementation, &v("v1.5.0")));
        assert!(!checker.satisfies(VersionValidation::Writable, &implementation, &v("v1.5.0")));
        assert!(checker.satisfies(VersionValidation::Writable, &implementation, &v("v1.0.0")));
        assert!(!checker.satisfies(VersionValidation::Identical, &implementation, &v("v1.0.0")));
        assert!(checker.satisfies(VersionValidation::Identical, &implementation, &v("v1.2.3+meta")));
    }

    #[test]
    fn test_migration_widens_read_and_write() {
        let mut table = MigrationTable::new();
        table.register(Arc::new(Bridge)).unwrap();
        let checker = CompatibilityChecker::new(&table);
        let implementation = v("v0.2.0");

        assert!(checker.can_read(&implementation, &v("v0.1.3")));
        assert!(checker.can_write(&implementation, &v("v0.1.3")));
        assert!(!checker.can_read(&implementation, &v("v0.1.2")));
        assert!(!checker.satisfies(VersionValidation::Identical, &implementation, &v("v0.1.3")));
    }

    #[test]
    fn test_report_order() {
        let table = MigrationTable::new();
        let checker = CompatibilityChecker::new(&table);
        let report = checker.report(&v("v0.1.0"), &v("v0.1.3"));
        assert_eq!(
            report,
            vec![
                (VersionValidation::None, true),
                (VersionValidation::Readable, true),
                (VersionValidation::Writable, false),
                (VersionValidation::Identical, false),
            ]
        );
    }

    #[test]
    fn test_breaking_changes() {
        assert!(CompatibilityChecker::is_breaking_change(&v("v0.1.3"), &v("v0.2.0")));
        assert!(CompatibilityChecker::is_breaking_change(&v("v1.9.0"), &v("v2.0.0")));
        assert!(!CompatibilityChecker::is_breaking_change(&v("v1.1.0"), &v("v1.9.0")));
    }

    #[test]
    fn test_validation_parse() {
        assert_eq!("Writable".parse::<VersionValidation>().unwrap(), VersionValidation::Writable);
        assert_eq!("exact".parse::<VersionValidation>().unwrap(), VersionValidation::Identical);
        assert!("sometimes".parse::<VersionValidation>().is_err());
        assert_eq!(VersionValidation::default().to_string(), "readable");
    }
}
