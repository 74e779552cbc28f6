//! Versioned documents and their materialization
//!
//! A [`Document`] is a strongly typed payload carrying a `schema_version`.
//! [`DocumentType`] describes one document type for the registry, and
//! [`DocumentBox`] holds a materialized document whose concrete type is only
//! known at run time (the type chosen by version resolution).
//!
//! Copyright (c) 2025 Aktorz Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::validation::{FieldStrictness, FieldViolation, SchemaViolation, ValidationContext, ValidationHelpers};
use crate::versioning::VersionId;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::any::{Any, TypeId};
use std::fmt;

/// Name of the field every document declares its version in
pub const SCHEMA_VERSION_FIELD: &str = "schema_version";

/// A typed, versioned document.
///
/// Implementations must serialize every field they deserialize (no
/// `skip_serializing_if`), because unknown-field detection compares the input
/// against the re-serialized document.
pub trait Document:
    Serialize + DeserializeOwned + Clone + PartialEq + fmt::Debug + Send + Sync + 'static
{
    /// Declared version of this document
    fn schema_version(&self) -> &VersionId;

    /// Re-stamp the declared version
    fn set_schema_version(&mut self, version: VersionId);

    /// Append field-level constraint failures.
    ///
    /// Called after deserialization succeeded; `context` is rooted at `$`.
    fn check_fields(&self, _context: &ValidationContext, _violations: &mut Vec<FieldViolation>) {}
}

/// Build a typed document from raw data, collecting every violation.
///
/// Deserialization errors, unknown fields (under [`FieldStrictness::Strict`])
/// and the type's own [`Document::check_fields`] failures all land in one
/// [`SchemaViolation`].
pub fn materialize<T: Document>(value: &Value, strictness: FieldStrictness) -> std::result::Result<T, SchemaViolation> {
    let context = ValidationContext::new(strictness);
    let document = T::deserialize(value)
        .map_err(|e| SchemaViolation::single(context.violation("type", e.to_string())))?;

    let mut violations = Vec::new();
    if strictness == FieldStrictness::Strict {
        match serde_json::to_value(&document) {
            Ok(known) => ValidationHelpers::unknown_fields(value, &known, &context, &mut violations),
            Err(e) => violations.push(context.violation("serialize", e.to_string())),
        }
    }
    document.check_fields(&context, &mut violations);

    SchemaViolation::from(violations).into_result()?;
    Ok(document)
}

trait ErasedDocument: Send + Sync + fmt::Debug {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
    fn clone_box(&self) -> Box<dyn ErasedDocument>;
    fn eq_dyn(&self, other: &dyn ErasedDocument) -> bool;
    fn to_value(&self) -> serde_json::Result<Value>;
    fn schema_version(&self) -> &VersionId;
    fn set_schema_version(&mut self, version: VersionId);
    fn type_name(&self) -> &'static str;
}

impl<T: Document> ErasedDocument for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn clone_box(&self) -> Box<dyn ErasedDocument> {
        Box::new(self.clone())
    }

    fn eq_dyn(&self, other: &dyn ErasedDocument) -> bool {
        other.as_any().downcast_ref::<T>().is_some_and(|other| self == other)
    }

    fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    fn schema_version(&self) -> &VersionId {
        Document::schema_version(self)
    }

    fn set_schema_version(&mut self, version: VersionId) {
        Document::set_schema_version(self, version)
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// An owned document of a type chosen at run time
#[derive(Debug)]
pub struct DocumentBox(Box<dyn ErasedDocument>);

impl DocumentBox {
    pub fn new<T: Document>(document: T) -> Self {
        Self(Box::new(document))
    }

    /// Declared version of the wrapped document
    pub fn schema_version(&self) -> &VersionId {
        self.0.schema_version()
    }

    pub fn set_schema_version(&mut self, version: VersionId) {
        self.0.set_schema_version(version)
    }

    /// Full Rust type name of the wrapped document
    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    pub fn is<T: Document>(&self) -> bool {
        self.0.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Document>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Document>(&mut self) -> Option<&mut T> {
        self.0.as_any_mut().downcast_mut::<T>()
    }

    /// Unwrap into the concrete type, handing the box back on mismatch
    pub fn downcast<T: Document>(self) -> std::result::Result<T, Self> {
        if self.is::<T>() {
            match self.0.into_any().downcast::<T>() {
                Ok(document) => Ok(*document),
                Err(_) => unreachable!("type checked above"),
            }
        } else {
            Err(self)
        }
    }

    /// Convert to a JSON value
    pub fn to_value(&self) -> Result<Value> {
        self.0
            .to_value()
            .map_err(|e| Error::json(format!("Failed to convert {} to JSON", self.type_name()), e))
    }

    /// Convert to pretty-printed JSON text
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_value()?)
            .map_err(|e| Error::json("Failed to render document", e))
    }
}

impl Clone for DocumentBox {
    fn clone(&self) -> Self {
        Self(self.0.clone_box())
    }
}

impl PartialEq for DocumentBox {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_dyn(other.0.as_ref())
    }
}

impl<T: Document> From<T> for DocumentBox {
    fn from(document: T) -> Self {
        Self::new(document)
    }
}

/// Describes one document type for registration
#[derive(Clone, Copy)]
pub struct DocumentType {
    name: &'static str,
    type_id: fn() -> TypeId,
    materialize: fn(&Value, FieldStrictness) -> std::result::Result<DocumentBox, SchemaViolation>,
}

impl DocumentType {
    pub fn of<T: Document>() -> Self {
        Self {
            name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>,
            materialize: |value, strictness| materialize::<T>(value, strictness).map(DocumentBox::new),
        }
    }

    /// Full Rust type name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Last path segment of the type name, for messages
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit("::").next().unwrap_or(self.name)
    }

    pub fn is<T: Document>(&self) -> bool {
        (self.type_id)() == TypeId::of::<T>()
    }

    /// Materialize raw data as this document type
    pub fn materialize(
        &self,
        value: &Value,
        strictness: FieldStrictness,
    ) -> std::result::Result<DocumentBox, SchemaViolation> {
        (self.materialize)(value, strictness)
    }
}

impl fmt::Debug for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentType").field("name", &self.name).finish()
    }
}

impl PartialEq for DocumentType {
    fn eq(&self, other: &Self) -> bool {
        (self.type_id)() == (other.type_id)()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct VersionOnly {
        schema_version: VersionId,
    }

    impl Document for VersionOnly {
        fn schema_version(&self) -> &VersionId {
            &self.schema_version
        }

        fn set_schema_version(&mut self, version: VersionId) {
            self.schema_version = version;
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Film {
        schema_version: VersionId,
        title: String,
        year: Option<i64>,
    }

    impl Document for Film {
        fn schema_version(&self) -> &VersionId {
            &self.schema_version
        }

        fn set_schema_version(&mut self, version: VersionId) {
            self.schema_version = version;
        }

        fn check_fields(&self, context: &ValidationContext, violations: &mut Vec<FieldViolation>) {
            ValidationHelpers::check_min_opt(self.year, 1850, &context.child("year"), violations);
        }
    }

    #[test]
    fn test_materialize_collects_all_violations() {
        let value = json!({"schema_version": "v1.0.0", "title": "A", "year": 1700, "rating": 3, "studio": "x"});
        let report = materialize::<Film>(&value, FieldStrictness::Strict).unwrap_err();
        let paths: Vec<_> = report.paths().collect();
        assert_eq!(paths, vec!["$.rating", "$.studio", "$.year"]);
    }

    #[test]
    fn test_ignore_drops_unknown_fields_only() {
        let value = json!({"schema_version": "v1.0.0", "title": "A", "rating": 3});
        let film = materialize::<Film>(&value, FieldStrictness::Ignore).unwrap();
        assert_eq!(film.title, "A");

        let value = json!({"schema_version": "v1.0.0", "title": "A", "year": 1700, "rating": 3});
        let report = materialize::<Film>(&value, FieldStrictness::Ignore).unwrap_err();
        assert_eq!(report.paths().collect::<Vec<_>>(), vec!["$.year"]);
    }

    #[test]
    fn test_type_errors_are_reported() {
        let value = json!({"schema_version": "v1.0.0"});
        let report = materialize::<Film>(&value, FieldStrictness::Strict).unwrap_err();
        assert_eq!(report.len(), 1);
        assert!(report.violations[0].reason.contains("title"));
    }

    #[test]
    fn test_document_box() {
        let film = Film {
            schema_version: VersionId::new(1, 0, 0),
            title: "A".into(),
            year: None,
        };
        let mut boxed = DocumentBox::new(film.clone());
        assert!(boxed.is::<Film>());
        assert!(!boxed.is::<VersionOnly>());
        assert_eq!(boxed.downcast_ref::<Film>(), Some(&film));
        assert_eq!(boxed.clone(), boxed);

        boxed.set_schema_version(VersionId::new(1, 1, 0));
        assert_eq!(boxed.schema_version().to_string(), "v1.1.0");
        assert_ne!(boxed, DocumentBox::new(film.clone()));

        let boxed = boxed.downcast::<VersionOnly>().unwrap_err();
        let film = boxed.downcast::<Film>().unwrap();
        assert_eq!(film.title, "A");
    }

    #[test]
    fn test_document_type() {
        let kind = DocumentType::of::<Film>();
        assert_eq!(kind.short_name(), "Film");
        assert!(kind.is::<Film>());
        assert_eq!(kind, DocumentType::of::<Film>());
        assert_ne!(kind, DocumentType::of::<VersionOnly>());

        let boxed = kind
            .materialize(&json!({"schema_version": "v1.0.0", "title": "A", "year": null}), FieldStrictness::Strict)
            .unwrap();
        assert!(boxed.is::<Film>());
    }
}
