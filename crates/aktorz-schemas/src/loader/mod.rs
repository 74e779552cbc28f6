//! Version-aware document loading
//!
//! Loading runs five strictly sequential stages:
//!
//! 1. **Resolved**: the target version is resolved to an implementation
//! 2. **Parsed**: a path, text buffer or mapping is normalized to a mapping
//! 3. **VersionChecked**: the declared `schema_version` is checked at the
//!    requested [`VersionValidation`](crate::versioning::VersionValidation) level
//! 4. **Migrated**: data declared at another version is reshaped
//! 5. **Materialized**: the typed document is built and optionally re-stamped
//!    with the requested version (a release candidate stays a release candidate)
//!
//! Any failure aborts the pipeline; no partial document is returned.
//!
//! Copyright (c) 2025 Aktorz Team
//! Licensed under the Apache-2.0 license

pub mod hook;
pub mod input;
pub mod parser;
pub mod pipeline;

pub use hook::{DefaultLoaderHook, LoaderHook};
pub use input::{InputOrigin, LoaderInput};
pub use parser::{DocumentParser, Format};
pub use pipeline::{LoadOptions, LoadStage, Loader};
