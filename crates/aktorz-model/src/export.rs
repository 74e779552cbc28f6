//! Exporter hooks for the older 0.1.x targets
//!
//! Newer 0.1.x documents can always be written in an older 0.1.x shape; the
//! hooks here drop what the older shape never had.
//!
//! Copyright (c) 2025 Aktorz Team
//! Licensed under the Apache-2.0 license

use crate::constraints::full_name;
use aktorz_schemas::{ExporterHook, MigrationContext, Projection, RawDocument, Result, VersionId};
use serde_json::Value;

/// Fields v0.1.3 added on top of v0.1.1
const V0_1_3_ADDITIONS: &[&str] = &[
    "actors.*.gender",
    "actors.*.home_town",
    "actors.*.spouses.*.birth_year",
    "actors.*.spouses.*.gender",
    "actors.*.spouses.*.home_town",
    "actors.*.movies.*.gross",
    "actors.*.movies.*.cast.*.salary",
];

/// Writes v0.1.1 and v0.1.2 documents
#[derive(Debug, Default, Clone, Copy)]
pub struct ExportV011;

impl ExporterHook for ExportV011 {
    fn projection(&self, _source: &VersionId, _target: &VersionId) -> Projection {
        Projection::exclude(V0_1_3_ADDITIONS.iter().copied())
    }
}

/// Writes v0.1.0 documents, whose cast members carry only `actor` and a
/// required `name`
#[derive(Debug, Default, Clone, Copy)]
pub struct ExportV010;

impl ExporterHook for ExportV010 {
    fn projection(&self, _source: &VersionId, _target: &VersionId) -> Projection {
        // Cast first/last names are still needed to derive `name`; they are
        // dropped in make_compatible.
        Projection::exclude(V0_1_3_ADDITIONS.iter().copied())
    }

    fn make_compatible(&self, context: &MigrationContext<'_>, data: RawDocument) -> Result<RawDocument> {
        let mut data = context.apply(data)?;
        for actor in data.get_mut("actors").and_then(Value::as_object_mut).into_iter().flat_map(|a| a.values_mut()) {
            let movies: Vec<&mut Value> = match actor.get_mut("movies") {
                Some(Value::Object(movies)) => movies.values_mut().collect(),
                Some(Value::Array(movies)) => movies.iter_mut().collect(),
                _ => continue,
            };
            for movie in movies {
                let Some(cast) = movie.get_mut("cast").and_then(Value::as_object_mut) else {
                    continue;
                };
                for member in cast.values_mut().filter_map(Value::as_object_mut) {
                    let first_name = member.remove("first_name");
                    let last_name = member.remove("last_name");
                    let has_name = member.get("name").and_then(Value::as_str).is_some_and(|name| !name.is_empty());
                    if !has_name {
                        let derived = full_name(
                            first_name.as_ref().and_then(Value::as_str),
                            last_name.as_ref().and_then(Value::as_str),
                        );
                        if let Some(derived) = derived {
                            member.insert("name".into(), Value::String(derived));
                        }
                    }
                }
            }
        }
        Ok(data)
    }
}
