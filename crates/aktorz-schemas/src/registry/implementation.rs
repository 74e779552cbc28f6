//! Per-version implementation bundles
//!
//! Copyright (c) 2025 Aktorz Team
//! Licensed under the Apache-2.0 license

use crate::document::{Document, DocumentType};
use crate::exporter::hook::{DefaultExporterHook, ExporterHook};
use crate::loader::hook::{DefaultLoaderHook, LoaderHook};
use crate::versioning::VersionId;
use std::sync::Arc;

/// Everything registered for one version: its document type and optional
/// loader/exporter overrides. Immutable once built.
#[derive(Debug, Clone)]
pub struct Implementation {
    version: VersionId,
    document_type: DocumentType,
    loader_hook: Option<Arc<dyn LoaderHook>>,
    exporter_hook: Option<Arc<dyn ExporterHook>>,
}

impl Implementation {
    /// An implementation of `version` materializing `T`, with default hooks
    pub fn new<T: Document>(version: VersionId) -> Self {
        Self {
            version,
            document_type: DocumentType::of::<T>(),
            loader_hook: None,
            exporter_hook: None,
        }
    }

    pub fn with_loader_hook<H: LoaderHook + 'static>(mut self, hook: H) -> Self {
        self.loader_hook = Some(Arc::new(hook));
        self
    }

    pub fn with_exporter_hook<H: ExporterHook + 'static>(mut self, hook: H) -> Self {
        self.exporter_hook = Some(Arc::new(hook));
        self
    }

    pub fn version(&self) -> &VersionId {
        &self.version
    }

    pub fn document_type(&self) -> &DocumentType {
        &self.document_type
    }

    pub fn has_loader_hook(&self) -> bool {
        self.loader_hook.is_some()
    }

    pub fn has_exporter_hook(&self) -> bool {
        self.exporter_hook.is_some()
    }

    /// The registered loader hook, or the generic behavior
    pub fn loader_hook(&self) -> &dyn LoaderHook {
        self.loader_hook.as_deref().unwrap_or(&DefaultLoaderHook)
    }

    /// The registered exporter hook, or the generic behavior
    pub fn exporter_hook(&self) -> &dyn ExporterHook {
        self.exporter_hook.as_deref().unwrap_or(&DefaultExporterHook)
    }
}
