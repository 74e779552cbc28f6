//! Check command handler
//!
//! Reports how a document's declared version fares against an
//! implementation at every validation level, without materializing it.

use super::utils::read_document;
use crate::cli::CheckArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::OutputWriter;
use aktorz_model::registry;
use aktorz_schemas::{VersionId, VersionValidation};
use serde::Serialize;
use tracing::{debug, instrument};

/// Outcome of checking one document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckReport {
    pub file: String,
    pub declared: VersionId,
    pub requested: VersionId,
    pub implementation: VersionId,
    /// Whether a registered migration bridges the declared and implementation versions
    pub migration: bool,
    pub levels: Vec<LevelOutcome>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelOutcome {
    pub validation: VersionValidation,
    pub passed: bool,
}

impl CheckReport {
    /// Whether the document passes `validation`
    pub fn passes(&self, validation: VersionValidation) -> bool {
        self.levels
            .iter()
            .any(|outcome| outcome.validation == validation && outcome.passed)
    }
}

/// Handle the check command
#[instrument(skip_all, fields(file = %args.file.display()))]
pub fn handle_check(args: CheckArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let report = build_report(&args, config)?;

    if !output.is_human() {
        return output.data(&report);
    }

    output.writeln(&format!("File:           {}", report.file))?;
    output.writeln(&format!("Declared:       {}", report.declared))?;
    if report.requested == report.implementation {
        output.writeln(&format!("Implementation: {}", report.implementation))?;
    } else {
        output.writeln(&format!(
            "Implementation: {} (requested {})",
            report.implementation, report.requested
        ))?;
    }
    if report.migration {
        output.writeln(&format!("Migration:      {} -> {}", report.declared, report.implementation))?;
    }
    output.writeln("")?;

    let rows = report
        .levels
        .iter()
        .map(|outcome| {
            let verdict = if outcome.passed { "pass" } else { "fail" };
            vec![outcome.validation.to_string(), verdict.to_string()]
        })
        .collect();
    output.table(&["Validation", "Result"], rows)
}

fn build_report(args: &CheckArgs, config: &Config) -> Result<CheckReport> {
    let (_, declared) = read_document(&args.file)?;
    let requested = match &args.schema_version {
        Some(version) => version.clone(),
        None => config.default_version()?,
    };

    let registry = registry();
    let implementation = registry.resolve(&requested)?.version().clone();
    debug!(%declared, %requested, %implementation, "Checking compatibility");

    let levels = registry
        .checker()
        .report(&implementation, &declared)
        .into_iter()
        .map(|(validation, passed)| LevelOutcome { validation, passed })
        .collect();

    Ok(CheckReport {
        file: args.file.display().to_string(),
        migration: registry.migrations().contains(&declared, &implementation),
        declared,
        requested,
        implementation,
        levels,
    })
}
