//! Load command handler

use super::utils::{emit_document, report_failure};
use crate::cli::LoadArgs;
use crate::config::Config;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use aktorz_model::registry;
use aktorz_schemas::LoadOptions;
use tracing::{info, instrument};

/// Handle the load command
#[instrument(skip_all, fields(file = %args.file.display()))]
pub fn handle_load(args: LoadArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("load_command", &args.file.display().to_string());

    let version = match &args.schema_version {
        Some(version) => version.clone(),
        None => config.default_version()?,
    };
    let options = LoadOptions {
        validation: args.validation.map(Into::into).unwrap_or(config.defaults.validation),
        update_version: config.defaults.update_version && !args.keep_version,
        field_strictness: args.field_strictness().unwrap_or(config.defaults.field_strictness),
    };

    let loader = registry().loader(&version)?;
    output.info(&format!(
        "Loading {} as {} ({} validation)",
        args.file.display(),
        loader.version(),
        options.validation
    ))?;

    let document = match loader.load(args.file.as_path(), &options) {
        Ok(document) => document,
        Err(e) => {
            report_failure(output, &e)?;
            return Err(e.into());
        }
    };
    info!(version = %document.schema_version(), "Document loaded");

    output.success(&format!("✓ Loaded {} document", document.schema_version()))?;
    emit_document(output, &document, args.save_to.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{OutputFormat, ValidationLevel};
    use crate::error::{Error, EXIT_INPUT, EXIT_SCHEMA, EXIT_VERSION};
    use crate::handlers::test_support::{capture, fixture};
    use aktorz_schemas::VersionId;
    use std::io::Write;
    use std::path::PathBuf;

    fn args(file: PathBuf, version: Option<&str>) -> LoadArgs {
        LoadArgs {
            file,
            schema_version: version.map(|v| VersionId::parse(v).unwrap()),
            validation: None,
            keep_version: false,
            lenient: false,
            save_to: None,
        }
    }

    #[test]
    fn test_load_migrates_to_current_version() {
        let (mut output, captured) = capture(OutputFormat::Json);
        handle_load(args(fixture("v0.1.3"), None), &Config::default(), &mut output).unwrap();

        let document = captured.json();
        assert_eq!(document["schema_version"], aktorz_model::CURRENT_VERSION);
        assert_eq!(document["movies"]["fast_five"]["cast"]["vin_diesel"]["character_id"], "dominic_toretto");
    }

    #[test]
    fn test_keep_version_and_configured_default() {
        let mut config = Config::default();
        config.defaults.version = Some(VersionId::new(0, 1, 3));

        let (mut output, captured) = capture(OutputFormat::Json);
        let mut load = args(fixture("v0.1.1"), None);
        load.keep_version = true;
        handle_load(load, &config, &mut output).unwrap();
        assert_eq!(captured.json()["schema_version"], "v0.1.1");
    }

    #[test]
    fn test_validation_flag_overrides_config() {
        let (mut output, _) = capture(OutputFormat::Json);
        let mut load = args(fixture("v0.1.2"), Some("v0.1.3"));
        load.validation = Some(ValidationLevel::Identical);
        let err = handle_load(load, &Config::default(), &mut output).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_VERSION);
    }

    #[test]
    fn test_schema_violation_report_in_json_mode() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(br#"{"schema_version": "v0.1.1", "actors": {"Bad Id": {"first_name": "A", "last_name": "B", "birth_year": 1700, "movies": {}}}}"#)
            .unwrap();

        let (mut output, captured) = capture(OutputFormat::Json);
        let err = handle_load(args(file.path().to_path_buf(), Some("v0.1.1")), &Config::default(), &mut output)
            .unwrap_err();
        assert_eq!(err.exit_code(), EXIT_SCHEMA);

        let report = captured.json();
        let paths: Vec<_> = report["violations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["path"].as_str().unwrap().to_string())
            .collect();
        assert!(paths.contains(&"$.actors.Bad Id".to_string()));
        assert!(paths.contains(&"$.actors.Bad Id.birth_year".to_string()));
    }

    #[test]
    fn test_lenient_drops_unknown_fields() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(b"schema_version: v0.1.0\nrating: 5\nactors: {}\n").unwrap();

        let (mut output, _) = capture(OutputFormat::Json);
        let err = handle_load(args(file.path().to_path_buf(), Some("v0.1.0")), &Config::default(), &mut output)
            .unwrap_err();
        assert_eq!(err.exit_code(), EXIT_SCHEMA);

        let (mut output, captured) = capture(OutputFormat::Json);
        let mut load = args(file.path().to_path_buf(), Some("v0.1.0"));
        load.lenient = true;
        handle_load(load, &Config::default(), &mut output).unwrap();
        assert_eq!(captured.json(), serde_json::json!({"schema_version": "v0.1.0", "actors": {}}));
    }

    #[test]
    fn test_missing_file() {
        let (mut output, _) = capture(OutputFormat::Human);
        let err = handle_load(args(PathBuf::from("does/not/exist.json"), None), &Config::default(), &mut output)
            .unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
        assert_eq!(err.exit_code(), EXIT_INPUT);
    }

    #[test]
    fn test_save_to_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("actors.yaml");

        let (mut output, captured) = capture(OutputFormat::Human);
        let mut load = args(fixture("v0.1.3"), Some("v0.1.3"));
        load.save_to = Some(target.clone());
        handle_load(load, &Config::default(), &mut output).unwrap();

        let saved = std::fs::read_to_string(&target).unwrap();
        assert!(saved.starts_with("schema_version: v0.1.3") || saved.contains("\nschema_version: v0.1.3"));
        assert!(captured.text().contains("Saved v0.1.3 document"));
    }
}
