//! Versions command handler

use crate::error::Result;
use crate::output::OutputWriter;
use aktorz_model::{registry, CURRENT_VERSION, PREVIOUS_VERSION};
use aktorz_schemas::{VersionId, VersionRegistry};
use serde::Serialize;

/// Everything the registry knows about versions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionsReport {
    pub current: VersionId,
    pub previous: VersionId,
    pub supported: Vec<SupportedVersion>,
    pub migrations: Vec<MigrationEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupportedVersion {
    pub version: VersionId,
    /// Version of the implementation the supported version resolves to
    pub implementation: VersionId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MigrationEntry {
    pub source: VersionId,
    pub target: VersionId,
    pub description: String,
}

impl VersionsReport {
    pub fn from_registry(registry: &VersionRegistry) -> Result<Self> {
        let supported = registry
            .supported()
            .iter()
            .map(|version| {
                let implementation = registry.resolve(version)?.version().clone();
                Ok(SupportedVersion {
                    version: version.clone(),
                    implementation,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let migrations = registry
            .migrations()
            .iter()
            .map(|migration| MigrationEntry {
                source: migration.source(),
                target: migration.target(),
                description: migration.description().to_string(),
            })
            .collect();

        Ok(Self {
            current: VersionId::parse(CURRENT_VERSION)?,
            previous: VersionId::parse(PREVIOUS_VERSION)?,
            supported,
            migrations,
        })
    }
}

/// Handle the versions command
pub fn handle_versions(output: &mut OutputWriter) -> Result<()> {
    let report = VersionsReport::from_registry(registry())?;

    if !output.is_human() {
        return output.data(&report);
    }

    output.writeln(&format!("Current version:  {}", report.current))?;
    output.writeln(&format!("Previous version: {}", report.previous))?;

    output.section("Supported versions")?;
    let rows = report
        .supported
        .iter()
        .map(|entry| vec![entry.version.to_string(), entry.implementation.to_string()])
        .collect();
    output.table(&["Version", "Implementation"], rows)?;

    output.section("Migrations")?;
    let rows = report
        .migrations
        .iter()
        .map(|entry| {
            vec![
                entry.source.to_string(),
                entry.target.to_string(),
                entry.description.clone(),
            ]
        })
        .collect();
    output.table(&["From", "To", "Description"], rows)
}
