//! Export command handler

use super::utils::{emit_document, read_document, report_failure};
use crate::cli::ExportArgs;
use crate::config::Config;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use aktorz_model::registry;
use aktorz_schemas::{ExportOptions, FieldStrictness, LoadOptions};
use tracing::{debug, info, instrument};

/// Handle the export command
#[instrument(skip_all, fields(file = %args.file.display(), to = %args.to))]
pub fn handle_export(args: ExportArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("export_command", &args.file.display().to_string());

    let (raw, declared) = read_document(&args.file)?;
    let from = args.from.clone().unwrap_or(declared);
    debug!(%from, "Loading export source");

    let load_options = LoadOptions {
        validation: config.defaults.validation,
        update_version: config.defaults.update_version,
        field_strictness: config.defaults.field_strictness,
    };
    let source = match registry().loader(&from)?.load(raw, &load_options) {
        Ok(document) => document,
        Err(e) => {
            report_failure(output, &e)?;
            return Err(e.into());
        }
    };

    let exporter = registry().exporter(&args.to)?;
    if source.schema_version() == exporter.requested() {
        output.warning(&format!(
            "Document is already at {}; exporting it changes nothing",
            exporter.requested()
        ))?;
    }
    output.info(&format!(
        "Exporting {} document as {}",
        source.schema_version(),
        exporter.requested()
    ))?;

    // The advisory above replaces the library's own warning
    let options = ExportOptions {
        update_version: config.defaults.update_version && !args.keep_version,
        field_strictness: args.field_strictness().unwrap_or(FieldStrictness::Ignore),
        warn_on_identical: false,
    };
    let exported = match exporter.export(&source, &options) {
        Ok(document) => document,
        Err(e) => {
            report_failure(output, &e)?;
            return Err(e.into());
        }
    };
    info!(version = %exported.schema_version(), "Document exported");

    output.success(&format!("✓ Exported {} document", exported.schema_version()))?;
    emit_document(output, &exported, args.save_to.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::error::EXIT_VERSION;
    use crate::handlers::test_support::{capture, fixture};
    use aktorz_schemas::{VersionId, VersionValidation};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn args(file: PathBuf, to: &str) -> ExportArgs {
        ExportArgs {
            file,
            to: VersionId::parse(to).unwrap(),
            from: None,
            keep_version: false,
            strict: false,
            save_to: None,
        }
    }

    fn loaded_fixture(version: &str) -> serde_json::Value {
        let version = VersionId::parse(version).unwrap();
        let options = LoadOptions::default().keep_version();
        registry()
            .loader(&version)
            .unwrap()
            .load(fixture(&version.to_string()).as_path(), &options)
            .unwrap()
            .to_value()
            .unwrap()
    }

    #[test]
    fn test_export_to_older_shape() {
        let (mut output, captured) = capture(OutputFormat::Json);
        handle_export(args(fixture("v0.1.3"), "v0.1.0"), &Config::default(), &mut output).unwrap();

        let exported = captured.json();
        assert_eq!(exported["schema_version"], "v0.1.0");
        assert_eq!(exported["actors"], loaded_fixture("v0.1.0")["actors"]);
    }

    #[test]
    fn test_export_to_newer_shape_through_migration() {
        let (mut output, captured) = capture(OutputFormat::Json);
        let mut export = args(fixture("v0.1.3"), "v0.2.0");
        export.strict = true;
        handle_export(export, &Config::default(), &mut output).unwrap();

        let exported = captured.json();
        assert_eq!(exported["schema_version"], "v0.2.0");
        assert_eq!(exported["movies"]["fast_five"]["characters"]["luke_hobbs"]["last_name"], "Hobbs");
    }

    #[test]
    fn test_from_overrides_declared_version() {
        // v0.1.2 data read as v0.1.3, then written back as v0.1.1
        let (mut output, captured) = capture(OutputFormat::Json);
        let mut export = args(fixture("v0.1.2"), "v0.1.1");
        export.from = Some(VersionId::new(0, 1, 3));
        handle_export(export, &Config::default(), &mut output).unwrap();
        assert_eq!(captured.json()["schema_version"], "v0.1.1");
    }

    #[test]
    fn test_keep_version() {
        let (mut output, captured) = capture(OutputFormat::Json);
        let mut export = args(fixture("v0.1.3"), "v0.1.1");
        export.keep_version = true;
        handle_export(export, &Config::default(), &mut output).unwrap();
        assert_eq!(captured.json()["schema_version"], "v0.1.3");
    }

    #[test]
    fn test_not_exportable() {
        let (mut output, _) = capture(OutputFormat::Json);
        let err = handle_export(args(fixture("v0.2.0"), "v0.1.3"), &Config::default(), &mut output).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_VERSION);
    }

    #[test]
    fn test_identical_export_warns_once() {
        let (mut output, captured) = capture(OutputFormat::Human);
        handle_export(args(fixture("v0.1.3"), "v0.1.3"), &Config::default(), &mut output).unwrap();

        let text = captured.text();
        assert!(text.starts_with("WARNING: Document is already at v0.1.3"));
        assert_eq!(text.matches("already at").count(), 1);
    }

    #[test]
    fn test_export_to_release_candidate_keeps_requested_version() {
        let (mut output, captured) = capture(OutputFormat::Json);
        handle_export(args(fixture("v0.1.3"), "v0.2.0-rc1"), &Config::default(), &mut output).unwrap();
        assert_eq!(captured.json()["schema_version"], "v0.2.0-rc1");
    }

    #[test]
    fn test_source_load_follows_configured_defaults() {
        let mut config = Config::default();
        config.defaults.validation = VersionValidation::Identical;

        // v0.1.2 data read as v0.1.3 passes Readable but not Identical
        let (mut output, _) = capture(OutputFormat::Json);
        let mut export = args(fixture("v0.1.2"), "v0.1.1");
        export.from = Some(VersionId::new(0, 1, 3));
        let err = handle_export(export, &config, &mut output).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_VERSION);
    }
}
