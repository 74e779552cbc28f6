// Tests for output formatting
//
// These tests render through a shared in-memory buffer so the exact bytes an
// `OutputWriter` produces can be inspected.

use super::*;
use aktorz_schemas::FieldViolation;
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).unwrap()
    }
}

fn writer(format: OutputFormat, quiet: bool) -> (OutputWriter, SharedBuffer) {
    let buffer = SharedBuffer::default();
    let writer = OutputWriter::with_writer(format, false, quiet, Box::new(buffer.clone()));
    (writer, buffer)
}

fn sample_violation() -> SchemaViolation {
    SchemaViolation::from(vec![
        FieldViolation::new("$.actors.charlie_chaplin.birth_year", "min", "must be at least 1850"),
        FieldViolation::new("$.actors.charlie_chaplin.rating", "unknown_field", "field is not allowed"),
    ])
}

#[test]
fn test_human_violation_report() {
    let formatted = OutputFormat::Human.format_violation(&sample_violation()).unwrap();
    assert_eq!(
        formatted,
        "✗ 2 field violation(s)\n\
         1. $.actors.charlie_chaplin.birth_year\n   Rule: min\n   Reason: must be at least 1850\n\
         2. $.actors.charlie_chaplin.rating\n   Rule: unknown_field\n   Reason: field is not allowed\n"
    );
}

#[test]
fn test_machine_violation_report() {
    let formatted = OutputFormat::Json.format_violation(&sample_violation()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&formatted).unwrap();
    assert_eq!(value["violations"][1]["rule"], "unknown_field");
}

#[test]
fn test_data_formats() {
    let value = serde_json::json!({"schema_version": "v0.1.3", "actors": {}});

    let (mut out, buffer) = writer(OutputFormat::Json, false);
    out.data(&value).unwrap();
    assert_eq!(buffer.contents(), "{\"actors\":{},\"schema_version\":\"v0.1.3\"}\n");

    let (mut out, buffer) = writer(OutputFormat::Yaml, false);
    out.data(&value).unwrap();
    assert_eq!(buffer.contents(), "actors: {}\nschema_version: v0.1.3\n");
}

#[test]
fn test_messages_only_in_human_mode() {
    let (mut out, buffer) = writer(OutputFormat::Json, false);
    out.info("Loading").unwrap();
    out.success("Loaded").unwrap();
    out.warning("Careful").unwrap();
    out.section("Document").unwrap();
    assert_eq!(buffer.contents(), "");

    let (mut out, buffer) = writer(OutputFormat::Human, false);
    out.info("Loading").unwrap();
    out.warning("Careful").unwrap();
    assert_eq!(buffer.contents(), "INFO: Loading\nWARNING: Careful\n");
}

#[test]
fn test_quiet_suppresses_messages_but_not_data() {
    let (mut out, buffer) = writer(OutputFormat::Human, true);
    out.info("Loading").unwrap();
    out.success("Loaded").unwrap();
    out.table(&["a"], vec![vec!["1".into()]]).unwrap();
    out.data(&serde_json::json!([1])).unwrap();
    assert_eq!(buffer.contents(), "[\n  1\n]\n");
}

#[test]
fn test_table_alignment() {
    let (mut out, buffer) = writer(OutputFormat::Human, false);
    out.table(
        &["Version", "Implementation"],
        vec![
            vec!["v0.1.0".into(), "v0.1.0".into()],
            vec!["v0.2.0-rc1".into(), "v0.2.0".into()],
        ],
    )
    .unwrap();
    assert_eq!(
        buffer.contents(),
        "Version    │ Implementation\n\
         ───────────┼───────────────\n\
         v0.1.0     │ v0.1.0\n\
         v0.2.0-rc1 │ v0.2.0\n"
    );
}
