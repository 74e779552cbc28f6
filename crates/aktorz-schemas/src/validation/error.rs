//! Field-level violation types reported by materialization
//!
//! Copyright (c) 2025 Aktorz Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::fmt;

/// One failed field-level constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// JSON path of the offending field, rooted at `$`
    pub path: String,
    /// Short rule identifier such as `min` or `unknown_field`
    pub rule: String,
    /// Human-readable reason
    pub reason: String,
}

impl FieldViolation {
    pub fn new<P, R, M>(path: P, rule: R, reason: M) -> Self
    where
        P: Into<String>,
        R: Into<String>,
        M: Into<String>,
    {
        Self {
            path: path.into(),
            rule: rule.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.path, self.reason, self.rule)
    }
}

/// Every violation found while materializing one document.
///
/// Materialization never stops at the first failure, so this carries the
/// complete list in the order the checks ran.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaViolation {
    pub violations: Vec<FieldViolation>,
}

impl SchemaViolation {
    pub fn new() -> Self {
        Self::default()
    }

    /// A violation report with a single entry
    pub fn single(violation: FieldViolation) -> Self {
        Self {
            violations: vec![violation],
        }
    }

    pub fn add(&mut self, violation: FieldViolation) {
        self.violations.push(violation);
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Paths of every offending field
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.violations.iter().map(|v| v.path.as_str())
    }

    /// Whether any violation was reported at `path`
    pub fn has_path(&self, path: &str) -> bool {
        self.paths().any(|p| p == path)
    }

    /// `Ok(())` when nothing was reported
    pub fn into_result(self) -> Result<(), SchemaViolation> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<Vec<FieldViolation>> for SchemaViolation {
    fn from(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} field violation(s)", self.violations.len())?;
        for violation in &self.violations {
            write!(f, "\n  - {}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaViolation {}
