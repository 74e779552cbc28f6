//! Field-level validation used while materializing documents
//!
//! Materialization reports problems as a [`SchemaViolation`]: a list of
//! `(path, reason)` pairs covering every failing field, not just the first.
//! Two levels of [`FieldStrictness`] decide whether unrecognised input fields
//! count as failures. The level is chosen per call and never stored globally.
//!
//! Copyright (c) 2025 Aktorz Team
//! Licensed under the Apache-2.0 license

pub mod base;
pub mod error;

pub use base::{FieldStrictness, ValidationContext, ValidationHelpers};
pub use error::{FieldViolation, SchemaViolation};
