//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API,
//! providing a type-safe and well-documented command interface.

use aktorz_schemas::{FieldStrictness, VersionId, VersionValidation};
use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use std::path::PathBuf;

/// Aktorz CLI - versioned actor and movie documents
///
/// Loads documents written at any supported schema version, migrates them
/// into the shape of a newer version, exports them back into older shapes and
/// explains version compatibility.
#[derive(Parser, Debug)]
#[command(
    name = "aktorz",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "AKTORZ_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load a document, migrating it into the requested version's shape
    Load(LoadArgs),

    /// Export a document into the shape of another version
    Export(ExportArgs),

    /// Report how a document's declared version relates to an implementation
    Check(CheckArgs),

    /// List supported versions, their implementations and registered migrations
    Versions,
}

/// Arguments for the load command
#[derive(Parser, Debug)]
pub struct LoadArgs {
    /// Path to the document (JSON or YAML)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Version to load the document as (defaults to the current version)
    #[arg(long, value_name = "VERSION", value_parser = parse_version)]
    pub schema_version: Option<VersionId>,

    /// Declared-version check to enforce
    #[arg(long, value_enum)]
    pub validation: Option<ValidationLevel>,

    /// Keep the declared version instead of re-stamping the document
    #[arg(long)]
    pub keep_version: bool,

    /// Drop unknown fields instead of rejecting them
    #[arg(long)]
    pub lenient: bool,

    /// Write the document to a file instead of stdout
    #[arg(long = "save-to", value_name = "OUTPUT_FILE")]
    pub save_to: Option<PathBuf>,
}

/// Arguments for the export command
#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Path to the document (JSON or YAML)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Version to export to
    #[arg(long, value_name = "VERSION", value_parser = parse_version)]
    pub to: VersionId,

    /// Version to load the document as before exporting (defaults to its declared version)
    #[arg(long, value_name = "VERSION", value_parser = parse_version)]
    pub from: Option<VersionId>,

    /// Keep the source version instead of stamping the target version
    #[arg(long)]
    pub keep_version: bool,

    /// Reject leftover fields the target shape does not know
    #[arg(long)]
    pub strict: bool,

    /// Write the document to a file instead of stdout
    #[arg(long = "save-to", value_name = "OUTPUT_FILE")]
    pub save_to: Option<PathBuf>,
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Path to the document (JSON or YAML)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Implementation version to check against (defaults to the current version)
    #[arg(long, value_name = "VERSION", value_parser = parse_version)]
    pub schema_version: Option<VersionId>,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Declared-version check levels
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ValidationLevel {
    /// Skip the check
    None,
    /// The implementation can read the declared version
    Readable,
    /// The implementation can write the declared version
    Writable,
    /// The declared version equals the implementation version
    Identical,
}

fn parse_version(text: &str) -> std::result::Result<VersionId, String> {
    VersionId::parse(text).map_err(|e| e.to_string())
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl From<ValidationLevel> for VersionValidation {
    fn from(level: ValidationLevel) -> Self {
        match level {
            ValidationLevel::None => VersionValidation::None,
            ValidationLevel::Readable => VersionValidation::Readable,
            ValidationLevel::Writable => VersionValidation::Writable,
            ValidationLevel::Identical => VersionValidation::Identical,
        }
    }
}

impl LoadArgs {
    pub fn field_strictness(&self) -> Option<FieldStrictness> {
        self.lenient.then_some(FieldStrictness::Ignore)
    }
}

impl ExportArgs {
    pub fn field_strictness(&self) -> Option<FieldStrictness> {
        self.strict.then_some(FieldStrictness::Strict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_level() {
        let cli = Cli {
            verbose: 2,
            quiet: false,
            config: None,
            output: None,
            no_color: false,
            command: Commands::Versions,
        };
        assert_eq!(cli.verbosity_level(), 2);

        let quiet_cli = Cli { quiet: true, ..cli };
        assert_eq!(quiet_cli.verbosity_level(), 0);
    }

    #[test]
    fn test_load_arguments() {
        let cli = Cli::parse_from([
            "aktorz",
            "load",
            "actors.yaml",
            "--schema-version",
            "v0.2.0",
            "--validation",
            "writable",
            "--lenient",
        ]);
        match cli.command {
            Commands::Load(args) => {
                assert_eq!(args.schema_version, Some(VersionId::new(0, 2, 0)));
                assert_eq!(args.validation.map(VersionValidation::from), Some(VersionValidation::Writable));
                assert_eq!(args.field_strictness(), Some(FieldStrictness::Ignore));
                assert!(!args.keep_version);
            }
            other => panic!("expected load, got {other:?}"),
        }
    }

    #[test]
    fn test_export_requires_target() {
        assert!(Cli::try_parse_from(["aktorz", "export", "actors.json"]).is_err());

        let cli = Cli::parse_from(["aktorz", "export", "actors.json", "--to", "v0.1.1", "--from", "0.1.3"]);
        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.to, VersionId::new(0, 1, 1));
                assert_eq!(args.from, Some(VersionId::new(0, 1, 3)));
                assert_eq!(args.field_strictness(), None);
            }
            other => panic!("expected export, got {other:?}"),
        }
    }

    #[test]
    fn test_schema_version_is_distinct_from_version_flag() {
        let cli = Cli::parse_from(["aktorz", "check", "actors.json", "--schema-version", "0.1.3"]);
        match cli.command {
            Commands::Check(args) => assert_eq!(args.schema_version, Some(VersionId::new(0, 1, 3))),
            other => panic!("expected check, got {other:?}"),
        }

        let err = Cli::try_parse_from(["aktorz", "load", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_malformed_version_is_a_usage_error() {
        let err = Cli::try_parse_from(["aktorz", "check", "actors.json", "--schema-version", "latest"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
