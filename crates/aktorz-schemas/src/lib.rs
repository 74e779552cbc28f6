//! Aktorz Schemas - versioned documents with compatibility-checked loading
//!
//! This crate keeps several released shapes of one document family alive side
//! by side. Every document declares a `schema_version`; a registry maps each
//! version to the Rust type that materializes it, and two pipelines move data
//! between the versions:
//!
//! - **Loading**: raw input (a path, text or a mapping) declared at some
//!   version is checked against an implementation, migrated when a migration
//!   is registered for the pair, and materialized as the implementation's type
//! - **Exporting**: a typed document is projected, reshaped and materialized
//!   as an older (or migrated-to) version's type
//!
//! ## Versions
//!
//! A [`VersionId`] is a prefixed semantic version such as `v0.1.3` or
//! `v0.2.0-rc1`. Compatibility follows semver: an implementation can read
//! data of the same major version (and, below `1.0.0`, the same minor
//! version), and can write data only when it is also not newer.
//!
//! ## Quick Start
//!
//! ```rust
//! use aktorz_schemas::{
//!     Document, Implementation, LoadOptions, RegistryBuilder, VersionId,
//! };
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
//! struct Catalog {
//!     schema_version: VersionId,
//!     titles: Vec<String>,
//! }
//!
//! impl Document for Catalog {
//!     fn schema_version(&self) -> &VersionId {
//!         &self.schema_version
//!     }
//!
//!     fn set_schema_version(&mut self, version: VersionId) {
//!         self.schema_version = version;
//!     }
//! }
//!
//! let v1 = VersionId::parse("v1.1.0")?;
//! let registry = RegistryBuilder::new()
//!     .support([v1.clone()])
//!     .register(Implementation::new::<Catalog>(v1.clone()))?
//!     .build();
//!
//! let catalog: Catalog = registry
//!     .loader(&v1)?
//!     .load_as(r#"{"schema_version": "v1.0.0", "titles": ["Modern Times"]}"#, &LoadOptions::default())?;
//! assert_eq!(catalog.schema_version, v1);
//! # Ok::<(), aktorz_schemas::Error>(())
//! ```

pub mod document;
pub mod error;
pub mod exporter;
pub mod loader;
pub mod registry;
pub mod validation;
pub mod versioning;

// Re-export commonly used types for convenience
pub use document::{Document, DocumentBox, DocumentType, SCHEMA_VERSION_FIELD};
pub use error::{Error, Result};
pub use exporter::{ExportOptions, Exporter, ExporterHook, FieldPattern, Projection};
pub use loader::{InputOrigin, LoadOptions, Loader, LoaderHook, LoaderInput};
pub use registry::{Implementation, RegistryBuilder, VersionRegistry};
pub use validation::{FieldStrictness, FieldViolation, SchemaViolation, ValidationContext, ValidationHelpers};
pub use versioning::{
    CompatibilityChecker, Migration, MigrationContext, MigrationTable, RawDocument, VersionId, VersionValidation,
};
