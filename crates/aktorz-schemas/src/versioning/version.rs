//! Prefixed semantic version identifiers
//!
//! A [`VersionId`] is a non-numeric prefix (`"v"` unless the text says
//! otherwise) followed by a strict three-component semantic version. Precedence
//! follows semantic versioning: a pre-release ranks below its release and build
//! metadata never takes part in equality or ordering. Identifiers with different
//! prefixes are never ordered relative to each other.
//!
//! Copyright (c) 2025 Aktorz Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use semver::{BuildMetadata, Prerelease, Version};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Prefix used when the version text does not carry one
pub const DEFAULT_PREFIX: &str = "v";

/// Prefixed semantic version
#[derive(Debug, Clone)]
pub struct VersionId {
    prefix: String,
    version: Version,
}

impl VersionId {
    /// Create a release version with the default prefix
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            version: Version::new(major, minor, patch),
        }
    }

    /// Parse version text, falling back to [`DEFAULT_PREFIX`]
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_with_prefix(text, DEFAULT_PREFIX)
    }

    /// Parse version text, falling back to `default_prefix` when the text has
    /// no non-numeric lead-in of its own.
    pub fn parse_with_prefix(text: &str, default_prefix: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::malformed_version(text, "version text is empty"));
        }
        if default_prefix.chars().any(|c| c.is_ascii_digit()) {
            return Err(Error::malformed_version(
                default_prefix,
                "a version prefix cannot contain digits",
            ));
        }

        let split = text
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| Error::malformed_version(text, "no numeric version component"))?;
        let (prefix, numeric) = text.split_at(split);
        let version = Version::parse(numeric)
            .map_err(|e| Error::malformed_version(text, e.to_string()))?;

        Ok(Self {
            prefix: if prefix.is_empty() {
                default_prefix.to_string()
            } else {
                prefix.to_string()
            },
            version,
        })
    }

    /// Convert a raw `schema_version` value into a [`VersionId`].
    ///
    /// Accepts the canonical string form as well as the structured form used
    /// by older documents:
    ///
    /// ```json
    /// { "prefix": "v", "semver": "0.1.2" }
    /// { "prefix": "v", "semver": { "major": 0, "minor": 1, "patch": 2 } }
    /// ```
    pub fn coerce(value: &Value, default_prefix: &str) -> Result<Self> {
        match value {
            Value::String(text) => Self::parse_with_prefix(text, default_prefix),
            Value::Object(parts) => {
                let prefix = match parts.get("prefix") {
                    None | Some(Value::Null) => default_prefix,
                    Some(Value::String(prefix)) => prefix.as_str(),
                    Some(other) => {
                        return Err(Error::malformed_version(
                            other.to_string(),
                            "structured version prefix must be a string",
                        ))
                    }
                };
                let semver = match parts.get("semver") {
                    Some(Value::String(semver)) => semver.clone(),
                    Some(Value::Object(triple)) => semver_from_parts(triple)?,
                    _ => {
                        return Err(Error::malformed_version(
                            value.to_string(),
                            "structured version requires a 'semver' field",
                        ))
                    }
                };
                Self::parse_with_prefix(&format!("{prefix}{semver}"), default_prefix)
            }
            other => Err(Error::malformed_version(
                other.to_string(),
                "expected a version string or a {prefix, semver} object",
            )),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn major(&self) -> u64 {
        self.version.major
    }

    pub fn minor(&self) -> u64 {
        self.version.minor
    }

    pub fn patch(&self) -> u64 {
        self.version.patch
    }

    /// Pre-release identifiers, if any
    pub fn prerelease(&self) -> Option<&str> {
        (!self.version.pre.is_empty()).then(|| self.version.pre.as_str())
    }

    /// Build metadata, if any
    pub fn build(&self) -> Option<&str> {
        (!self.version.build.is_empty()).then(|| self.version.build.as_str())
    }

    pub fn is_prerelease(&self) -> bool {
        !self.version.pre.is_empty()
    }

    /// The semantic version without its prefix
    pub fn semver(&self) -> &Version {
        &self.version
    }

    /// The same version with pre-release and build metadata stripped
    pub fn finalize(&self) -> Self {
        let mut version = self.version.clone();
        version.pre = Prerelease::EMPTY;
        version.build = BuildMetadata::EMPTY;
        Self {
            prefix: self.prefix.clone(),
            version,
        }
    }

    /// Semantic version precedence, ignoring the prefix and build metadata
    pub fn cmp_precedence(&self, other: &Self) -> Ordering {
        let this = &self.version;
        let that = &other.version;
        (this.major, this.minor, this.patch)
            .cmp(&(that.major, that.minor, that.patch))
            .then_with(|| this.pre.cmp(&that.pre))
    }

    /// The inclusive "greater than" of the version algebra.
    ///
    /// True when both prefixes match and this version's precedence is greater
    /// than *or equal to* `other`'s, so `v.succeeds(&v)` holds while
    /// `v > v` does not.
    pub fn succeeds(&self, other: &Self) -> bool {
        self.prefix == other.prefix && self.cmp_precedence(other) != Ordering::Less
    }

    /// Strict "less than": same prefix and lower precedence
    pub fn precedes(&self, other: &Self) -> bool {
        self.prefix == other.prefix && self.cmp_precedence(other) == Ordering::Less
    }

    /// Whether an implementation at this version can read data declared as
    /// `other`: same prefix, same major and, while major is zero, same minor.
    pub fn can_read(&self, other: &Self) -> bool {
        if self.prefix != other.prefix || self.major() != other.major() {
            return false;
        }
        self.major() != 0 || self.minor() == other.minor()
    }

    /// Whether an implementation at this version can write data in the shape
    /// of `other`. Requires [`can_read`](Self::can_read) and `other <= self`.
    pub fn can_write(&self, other: &Self) -> bool {
        self.can_read(other) && (other == self || other.precedes(self))
    }
}

fn semver_from_parts(parts: &serde_json::Map<String, Value>) -> Result<String> {
    let component = |name: &str| {
        parts.get(name).and_then(Value::as_u64).ok_or_else(|| {
            Error::malformed_version(
                Value::Object(parts.clone()).to_string(),
                format!("structured semver is missing numeric '{name}'"),
            )
        })
    };
    let mut text = format!(
        "{}.{}.{}",
        component("major")?,
        component("minor")?,
        component("patch")?
    );
    if let Some(pre) = parts.get("prerelease").and_then(Value::as_str) {
        text.push('-');
        text.push_str(pre);
    }
    if let Some(build) = parts.get("build").and_then(Value::as_str) {
        text.push('+');
        text.push_str(build);
    }
    Ok(text)
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.version)
    }
}

impl FromStr for VersionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl PartialEq for VersionId {
    fn eq(&self, other: &Self) -> bool {
        self.prefix == other.prefix && self.cmp_precedence(other) == Ordering::Equal
    }
}

impl Eq for VersionId {}

impl PartialEq<str> for VersionId {
    fn eq(&self, other: &str) -> bool {
        Self::parse(other).is_ok_and(|other| *self == other)
    }
}

impl PartialEq<&str> for VersionId {
    fn eq(&self, other: &&str) -> bool {
        *self == **other
    }
}

impl Hash for VersionId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.prefix.hash(state);
        self.version.major.hash(state);
        self.version.minor.hash(state);
        self.version.patch.hash(state);
        self.version.pre.hash(state);
    }
}

impl PartialOrd for VersionId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        (self.prefix == other.prefix).then(|| self.cmp_precedence(other))
    }
}

impl Serialize for VersionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VersionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
