//! Shared utilities for command handlers

use crate::error::{ErrorContext, Result};
use crate::output::OutputWriter;
use aktorz_schemas::loader::hook::declared_version;
use aktorz_schemas::loader::{DocumentParser, Format};
use aktorz_schemas::{DocumentBox, Error as SchemaError, InputOrigin, RawDocument, VersionId};
use std::path::Path;
use tracing::debug;

/// Read a document file and its declared version without materializing it
pub fn read_document(path: &Path) -> Result<(RawDocument, VersionId)> {
    let raw = DocumentParser::new().parse_file(path)?;
    let declared = declared_version(&raw, &InputOrigin::Path(path.to_path_buf()))?;
    debug!(file = %path.display(), %declared, "Read document");
    Ok((raw, declared))
}

/// Print a document, or save it when `save_to` is given.
///
/// Saved files are YAML for `.yaml`/`.yml` paths and JSON otherwise.
pub fn emit_document(output: &mut OutputWriter, document: &DocumentBox, save_to: Option<&Path>) -> Result<()> {
    match save_to {
        Some(path) => {
            let format = Format::from_path(path).unwrap_or(Format::Json);
            let content = DocumentParser::new().serialize(&document.to_value()?, format)?;
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            output.success(&format!("✓ Saved {} document to {}", document.schema_version(), path.display()))
        }
        None => output.document(document),
    }
}

/// Write the structured violation report for machine-readable formats.
///
/// Human output already gets every violation through the error message.
pub fn report_failure(output: &mut OutputWriter, error: &SchemaError) -> Result<()> {
    match error.violation() {
        Some(violation) if !output.is_human() => output.violation(violation),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Write;

    #[test]
    fn test_read_document() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(b"schema_version: v0.1.3\nactors: {}\n").unwrap();

        let (raw, declared) = read_document(file.path()).unwrap();
        assert_eq!(declared, VersionId::new(0, 1, 3));
        assert!(raw.contains_key("actors"));
    }

    #[test]
    fn test_read_document_without_version() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(b"{\"actors\": {}}").unwrap();

        let err = read_document(file.path()).unwrap_err();
        assert!(matches!(err, Error::Schema(SchemaError::MissingVersionField { .. })));
    }
}
