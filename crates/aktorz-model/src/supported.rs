//! The supported-version allow-list and the registry built from it
//!
//! Copyright (c) 2025 Aktorz Team
//! Licensed under the Apache-2.0 license

use crate::export::{ExportV010, ExportV011};
use crate::migration::NormalizeCollections;
use crate::{v0_1_0, v0_1_1, v0_1_2, v0_1_3, v0_2_0};
use aktorz_schemas::{Implementation, RegistryBuilder, Result, VersionId, VersionRegistry};
use std::sync::OnceLock;

/// Every released version, oldest first. The last entry is current.
pub const SUPPORTED_VERSIONS: &[&str] = &[
    "v0.1.0",
    "v0.1.1",
    "v0.1.2",
    "v0.1.3",
    "v0.2.0-rc1",
    "v0.2.0-rc2",
];

/// The version new documents are written in
pub const CURRENT_VERSION: &str = "v0.2.0-rc2";

/// The version before [`CURRENT_VERSION`]
pub const PREVIOUS_VERSION: &str = "v0.2.0-rc1";

/// Assemble a fresh registry of every implementation and migration
pub fn build_registry() -> Result<VersionRegistry> {
    let supported = SUPPORTED_VERSIONS
        .iter()
        .map(|version| VersionId::parse(version))
        .collect::<Result<Vec<_>>>()?;

    let registry = RegistryBuilder::new()
        .support(supported)
        .register(
            Implementation::new::<v0_1_0::Model>(VersionId::parse(v0_1_0::VERSION)?).with_exporter_hook(ExportV010),
        )?
        .register(
            Implementation::new::<v0_1_1::Model>(VersionId::parse(v0_1_1::VERSION)?).with_exporter_hook(ExportV011),
        )?
        .register(
            Implementation::new::<v0_1_2::Model>(VersionId::parse(v0_1_2::VERSION)?).with_exporter_hook(ExportV011),
        )?
        .register(Implementation::new::<v0_1_3::Model>(VersionId::parse(v0_1_3::VERSION)?))?
        .register(Implementation::new::<v0_2_0::Model>(VersionId::parse(v0_2_0::VERSION)?))?
        .migration(NormalizeCollections)?
        .build();
    Ok(registry)
}

/// The process-wide registry, built on first use.
///
/// # Panics
///
/// Panics if the registry configuration itself is defective (a duplicate
/// registration or an unparsable version constant). That is a programming
/// error caught by this crate's tests, never a property of input data.
pub fn registry() -> &'static VersionRegistry {
    static REGISTRY: OnceLock<VersionRegistry> = OnceLock::new();
    REGISTRY.get_or_init(|| match build_registry() {
        Ok(registry) => registry,
        Err(e) => panic!("aktorz model registry is misconfigured: {e}"),
    })
}
