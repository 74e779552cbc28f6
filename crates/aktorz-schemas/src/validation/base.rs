//! Validation context and common field checks
//!
//! Copyright (c) 2025 Aktorz Team
//! Licensed under the Apache-2.0 license

use crate::validation::error::FieldViolation;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// How materialization treats input fields the document type does not know
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldStrictness {
    /// Unknown fields are reported as violations
    #[default]
    Strict,
    /// Unknown fields are dropped silently
    Ignore,
}

impl fmt::Display for FieldStrictness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Ignore => write!(f, "ignore"),
        }
    }
}

impl FromStr for FieldStrictness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "ignore" => Ok(Self::Ignore),
            other => Err(format!("unknown field strictness '{other}'")),
        }
    }
}

/// Path-tracking context handed to field checks
#[derive(Debug, Clone)]
pub struct ValidationContext {
    /// Current JSON path
    pub path: String,
    pub strictness: FieldStrictness,
}

impl ValidationContext {
    pub fn new(strictness: FieldStrictness) -> Self {
        Self {
            path: "$".to_string(),
            strictness,
        }
    }

    /// Create a child context with updated path
    pub fn child<P: AsRef<str>>(&self, path_segment: P) -> Self {
        Self {
            path: format!("{}.{}", self.path, path_segment.as_ref()),
            strictness: self.strictness,
        }
    }

    /// Create a child context for array index
    pub fn child_index(&self, index: usize) -> Self {
        Self {
            path: format!("{}[{}]", self.path, index),
            strictness: self.strictness,
        }
    }

    /// A violation located at this context's path
    pub fn violation<R: Into<String>, M: Into<String>>(&self, rule: R, reason: M) -> FieldViolation {
        FieldViolation::new(self.path.clone(), rule, reason)
    }
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::new(FieldStrictness::default())
    }
}

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-z][a-z0-9_]+$").expect("identifier pattern is valid"))
}

/// Helper functions for common validation patterns.
///
/// Each helper appends to `out` rather than returning early so a document can
/// report every failing field in one pass.
pub struct ValidationHelpers;

impl ValidationHelpers {
    /// `value` must be at least `min`
    pub fn check_min(value: i64, min: i64, context: &ValidationContext, out: &mut Vec<FieldViolation>) {
        if value < min {
            out.push(context.violation("min", format!("{value} is less than the minimum {min}")));
        }
    }

    /// Optional variant of [`check_min`](Self::check_min)
    pub fn check_min_opt(
        value: Option<i64>,
        min: i64,
        context: &ValidationContext,
        out: &mut Vec<FieldViolation>,
    ) {
        if let Some(value) = value {
            Self::check_min(value, min, context, out);
        }
    }

    /// Lower-case identifier: a letter followed by letters, digits or `_`
    pub fn check_identifier(id: &str, context: &ValidationContext, out: &mut Vec<FieldViolation>) {
        if !identifier_pattern().is_match(id) {
            out.push(context.violation(
                "identifier",
                format!("'{id}' does not match [a-z][a-z0-9_]+"),
            ));
        }
    }

    /// `value` must be one of `allowed`
    pub fn check_one_of(
        value: &str,
        allowed: &[&str],
        context: &ValidationContext,
        out: &mut Vec<FieldViolation>,
    ) {
        if !allowed.contains(&value) {
            out.push(context.violation(
                "enum_value",
                format!("'{value}' is not one of: {}", allowed.join(", ")),
            ));
        }
    }

    /// Report every field present in `input` but absent from `known`.
    ///
    /// `known` is the document re-serialized after deserialization, so any key
    /// it lacks was not recognised by the document type. Null input values are
    /// never reported; they carry no data.
    pub fn unknown_fields(
        input: &Value,
        known: &Value,
        context: &ValidationContext,
        out: &mut Vec<FieldViolation>,
    ) {
        match (input, known) {
            (Value::Object(input), Value::Object(known)) => {
                for (key, value) in input {
                    match known.get(key) {
                        Some(known_value) => {
                            Self::unknown_fields(value, known_value, &context.child(key), out)
                        }
                        None if value.is_null() => {}
                        None => out.push(
                            context
                                .child(key)
                                .violation("unknown_field", "field is not part of the document"),
                        ),
                    }
                }
            }
            (Value::Array(input), Value::Array(known)) => {
                for (index, (value, known_value)) in input.iter().zip(known).enumerate() {
                    Self::unknown_fields(value, known_value, &context.child_index(index), out);
                }
            }
            _ => {}
        }
    }
}
