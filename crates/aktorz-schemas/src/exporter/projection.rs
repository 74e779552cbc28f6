//! Include/exclude field projections
//!
//! Copyright (c) 2025 Aktorz Team
//! Licensed under the Apache-2.0 license

use serde_json::Value;
use std::fmt;

/// A dotted field path where `*` matches any map key or list item.
///
/// `actors.*.movies.*.cast.*.salary` names the salary of every cast member of
/// every movie of every actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPattern {
    segments: Vec<String>,
}

impl FieldPattern {
    pub fn new(pattern: &str) -> Self {
        Self {
            segments: pattern
                .split('.')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl From<&str> for FieldPattern {
    fn from(pattern: &str) -> Self {
        Self::new(pattern)
    }
}

impl fmt::Display for FieldPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

fn segment_matches(segment: &str, key: &str) -> bool {
    segment == "*" || segment == key
}

/// Subtractive restriction of a document's fields.
///
/// With `include` set, only matched paths (and the containers leading to them)
/// survive. `exclude` then removes matched paths. The default keeps everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    include: Option<Vec<FieldPattern>>,
    exclude: Vec<FieldPattern>,
}

impl Projection {
    /// No restriction
    pub fn all() -> Self {
        Self::default()
    }

    /// Keep only the given paths
    pub fn include<I, P>(patterns: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<FieldPattern>,
    {
        Self {
            include: Some(patterns.into_iter().map(Into::into).collect()),
            exclude: Vec::new(),
        }
    }

    /// Drop the given paths
    pub fn exclude<I, P>(patterns: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<FieldPattern>,
    {
        Self::all().and_exclude(patterns)
    }

    /// Add more paths to drop
    pub fn and_exclude<I, P>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<FieldPattern>,
    {
        self.exclude.extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn is_unrestricted(&self) -> bool {
        self.include.is_none() && self.exclude.is_empty()
    }

    /// Apply the projection to a value
    pub fn apply(&self, value: Value) -> Value {
        let mut value = match &self.include {
            Some(patterns) => {
                let segments: Vec<&[String]> = patterns.iter().map(FieldPattern::segments).collect();
                retain(value, &segments)
            }
            None => value,
        };
        for pattern in &self.exclude {
            remove(&mut value, pattern.segments());
        }
        value
    }
}

fn retain(value: Value, patterns: &[&[String]]) -> Value {
    if patterns.iter().any(|pattern| pattern.is_empty()) {
        return value;
    }
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter_map(|(key, child)| {
                    let rest: Vec<&[String]> = patterns
                        .iter()
                        .filter(|pattern| segment_matches(&pattern[0], &key))
                        .map(|pattern| &pattern[1..])
                        .collect();
                    (!rest.is_empty()).then(|| (key, retain(child, &rest)))
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .enumerate()
                .filter_map(|(index, child)| {
                    let key = index.to_string();
                    let rest: Vec<&[String]> = patterns
                        .iter()
                        .filter(|pattern| segment_matches(&pattern[0], &key))
                        .map(|pattern| &pattern[1..])
                        .collect();
                    (!rest.is_empty()).then(|| retain(child, &rest))
                })
                .collect(),
        ),
        scalar => scalar,
    }
}

fn remove(value: &mut Value, pattern: &[String]) {
    let Some((head, rest)) = pattern.split_first() else {
        return;
    };
    match value {
        Value::Object(map) => {
            if rest.is_empty() {
                map.retain(|key, _| !segment_matches(head, key));
            } else {
                for (key, child) in map.iter_mut() {
                    if segment_matches(head, key) {
                        remove(child, rest);
                    }
                }
            }
        }
        Value::Array(items) => {
            if rest.is_empty() {
                let mut index = 0;
                items.retain(|_| {
                    let keep = !segment_matches(head, &index.to_string());
                    index += 1;
                    keep
                });
            } else {
                for (index, child) in items.iter_mut().enumerate() {
                    if segment_matches(head, &index.to_string()) {
                        remove(child, rest);
                    }
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "schema_version": "v0.1.3",
            "actors": {
                "charlie_chaplin": {
                    "first_name": "Charlie",
                    "gender": "male",
                    "movies": [
                        {"title": "Modern Times", "gross": 1, "cast": {"tramp": {"actor": "charlie_chaplin", "salary": 2}}}
                    ]
                }
            }
        })
    }

    #[test]
    fn test_unrestricted_is_identity() {
        assert!(Projection::all().is_unrestricted());
        assert_eq!(Projection::all().apply(sample()), sample());
    }

    #[test]
    fn test_exclude_with_wildcards() {
        let projection = Projection::exclude([
            "actors.*.gender",
            "actors.*.movies.*.gross",
            "actors.*.movies.*.cast.*.salary",
        ]);
        assert_eq!(
            projection.apply(sample()),
            json!({
                "schema_version": "v0.1.3",
                "actors": {
                    "charlie_chaplin": {
                        "first_name": "Charlie",
                        "movies": [
                            {"title": "Modern Times", "cast": {"tramp": {"actor": "charlie_chaplin"}}}
                        ]
                    }
                }
            })
        );
    }

    #[test]
    fn test_include_keeps_matched_paths() {
        let projection = Projection::include(["schema_version", "actors.*.first_name", "actors.*.movies.*.title"]);
        assert_eq!(
            projection.apply(sample()),
            json!({
                "schema_version": "v0.1.3",
                "actors": {
                    "charlie_chaplin": {
                        "first_name": "Charlie",
                        "movies": [{"title": "Modern Times"}]
                    }
                }
            })
        );
    }

    #[test]
    fn test_include_then_exclude() {
        let projection = Projection::include(["actors"]).and_exclude(["actors.charlie_chaplin.movies"]);
        assert_eq!(
            projection.apply(sample()),
            json!({"actors": {"charlie_chaplin": {"first_name": "Charlie", "gender": "male"}}})
        );
    }

    #[test]
    fn test_exclude_list_items_by_index() {
        let value = json!({"filmography": [["A", 1936], ["B", 1940]]});
        assert_eq!(
            Projection::exclude(["filmography.0"]).apply(value),
            json!({"filmography": [["B", 1940]]})
        );
    }

    #[test]
    fn test_pattern_display() {
        assert_eq!(FieldPattern::new("a..b.*").to_string(), "a.b.*");
    }
}
