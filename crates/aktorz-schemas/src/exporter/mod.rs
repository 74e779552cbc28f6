//! Version-aware document export
//!
//! Exporting mirrors loading with the roles reversed: the target
//! implementation is resolved, the source document's version must be able to
//! write the target shape, the source data is projected and reshaped, and the
//! result is materialized as the target document type. Leftover fields are
//! ignored during that last step by default, scoped to the single call.
//!
//! Copyright (c) 2025 Aktorz Team
//! Licensed under the Apache-2.0 license

pub mod hook;
pub mod pipeline;
pub mod projection;

pub use hook::{DefaultExporterHook, ExporterHook};
pub use pipeline::{ExportOptions, Exporter};
pub use projection::{FieldPattern, Projection};
