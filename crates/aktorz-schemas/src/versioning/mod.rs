//! Version identifiers, compatibility rules and version-pair migrations
//!
//! - [`VersionId`]: prefixed semantic versions and the `can_read`/`can_write` algebra
//! - [`CompatibilityChecker`]: validation levels applied by the loader
//! - [`MigrationTable`]: structural migrations keyed by `(source, target)`
//!
//! Copyright (c) 2025 Aktorz Team
//! Licensed under the Apache-2.0 license

pub mod compatibility;
pub mod migration;
pub mod version;

pub use compatibility::{CompatibilityChecker, VersionValidation};
pub use migration::{Migration, MigrationContext, MigrationTable, RawDocument};
pub use version::{VersionId, DEFAULT_PREFIX};
