//! Error types and handling for the CLI
//!
//! This module provides error types and utilities for handling
//! various failure modes in the CLI application, and maps each one
//! onto the process exit code scripts can branch on.

use aktorz_schemas::Error as SchemaError;
use std::io;
use std::path::PathBuf;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Exit code for anything without a more specific code
pub const EXIT_FAILURE: i32 = 1;
/// Exit code for invalid command-line usage
pub const EXIT_USAGE: i32 = 2;
/// Exit code for version resolution and compatibility failures
pub const EXIT_VERSION: i32 = 3;
/// Exit code for documents that do not match their schema
pub const EXIT_SCHEMA: i32 = 4;
/// Exit code for unreadable or malformed input
pub const EXIT_INPUT: i32 = 5;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (writing output files, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from the document library
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Configuration file could not be used
    #[error("Configuration error in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    /// Invalid argument combination
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error with context
    #[error("{message}")]
    Other {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid arguments error
    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::InvalidArgs(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            source: None,
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Schema(error) => schema_exit_code(error),
            Self::InvalidArgs(_) => EXIT_USAGE,
            Self::Io(_) | Self::Config { .. } | Self::Json(_) | Self::Yaml(_) | Self::Other { .. } => {
                EXIT_FAILURE
            }
        }
    }

    /// Check if this error should display usage help
    pub fn should_show_help(&self) -> bool {
        matches!(self, Self::InvalidArgs(_))
    }
}

fn schema_exit_code(error: &SchemaError) -> i32 {
    match error {
        SchemaError::MalformedVersion { .. }
        | SchemaError::UnresolvedVersion { .. }
        | SchemaError::MissingVersionField { .. }
        | SchemaError::IncompatibleVersion { .. }
        | SchemaError::NotExportable { .. } => EXIT_VERSION,
        SchemaError::SchemaViolation { .. }
        | SchemaError::DocumentTypeMismatch { .. }
        | SchemaError::UnsupportedMigrationShape { .. } => EXIT_SCHEMA,
        SchemaError::UnsupportedInputKind { .. }
        | SchemaError::InputUnavailable { .. }
        | SchemaError::MalformedInput { .. } => EXIT_INPUT,
        SchemaError::DuplicateImplementation { .. }
        | SchemaError::DuplicateMigration { .. }
        | SchemaError::IncompleteRegistry { .. }
        | SchemaError::Json { .. } => EXIT_FAILURE,
    }
}

/// Extension trait for displaying errors with context
pub trait ErrorContext<T> {
    /// Add context to an error
    fn context(self, msg: &str) -> Result<T>;

    /// Add context with a closure (only evaluated on error)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: &str) -> Result<T> {
        self.with_context(|| msg.to_string())
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let message = format!("{}: {}", f(), e);
            Error::Other {
                message,
                source: Some(anyhow::Error::new(e)),
            }
        })
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), error)
    } else {
        format!("Error: {}", error)
    }
}
