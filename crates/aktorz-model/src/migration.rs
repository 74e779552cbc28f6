//! The v0.1.3 → v0.2.0 migration
//!
//! v0.1.3 nests everything under its actors: each actor owns a movie
//! collection (a map or a list), a filmography of `(title, year)` pairs and a
//! map of spouses. v0.2.0 keeps one global `movies` collection and one global
//! `actors` collection, linked by id. The migration:
//!
//! - collects every actor's movies and filmography into `movies`, keyed by the
//!   map key or, for list entries, by the title lower-cased with spaces
//!   replaced by `_`. The first occurrence of a movie wins; later occurrences
//!   only fill fields the first one lacks and add cast entries it lacks.
//! - turns each one-directional spouse entry into a symmetric edge, creating
//!   spouses that are not actors as people without movies.
//! - splits each movie's cast into `cast` (keyed by actor) and `characters`
//!   (keyed by character), adding actors that only appear in casts.
//!
//! Data it cannot reshape without losing information (spouses with children,
//! an actor married to themself, an actor playing two characters in one
//! movie, a movie collection that is neither a map nor a list) is rejected
//! with [`Error::UnsupportedMigrationShape`].
//!
//! Copyright (c) 2025 Aktorz Team
//! Licensed under the Apache-2.0 license

use aktorz_schemas::{Error, Migration, RawDocument, Result, VersionId, SCHEMA_VERSION_FIELD};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Used for character or synthesized actor names that cannot be recovered
const UNKNOWN_NAME: &str = "Unknown";

/// Movie id synthesized from a title
pub fn movie_id_from_title(title: &str) -> String {
    title.to_lowercase().replace(' ', "_")
}

/// Reshapes v0.1.3 data into the normalized v0.2.0 layout
#[derive(Debug, Default, Clone, Copy)]
pub struct NormalizeCollections;

impl Migration for NormalizeCollections {
    fn source(&self) -> VersionId {
        VersionId::new(0, 1, 3)
    }

    fn target(&self) -> VersionId {
        VersionId::new(0, 2, 0)
    }

    fn description(&self) -> &str {
        "normalize per-actor movies and spouses into global collections"
    }

    fn migrate(&self, data: &RawDocument) -> Result<RawDocument> {
        let mut run = MigrationRun::new(self.source(), self.target());

        let actors = match data.get("actors") {
            Some(Value::Object(actors)) => actors,
            Some(other) => return Err(run.unsupported("actors", format!("expected a map, got {}", kind(other)))),
            None => return Err(run.unsupported("actors", "field is missing")),
        };
        let actors: BTreeMap<&String, &Value> = actors.iter().collect();

        for (actor_id, actor) in &actors {
            run.add_actor(actor_id, actor)?;
        }
        for (actor_id, actor) in &actors {
            run.link_spouses(actor_id, actor)?;
        }
        run.split_casts()?;

        Ok(run.finish(data))
    }
}

struct MigrationRun {
    source: VersionId,
    target: VersionId,
    actors: BTreeMap<String, Map<String, Value>>,
    actor_movies: BTreeMap<String, BTreeSet<String>>,
    actor_spouses: BTreeMap<String, BTreeSet<String>>,
    movies: BTreeMap<String, Map<String, Value>>,
}

impl MigrationRun {
    fn new(source: VersionId, target: VersionId) -> Self {
        Self {
            source,
            target,
            actors: BTreeMap::new(),
            actor_movies: BTreeMap::new(),
            actor_spouses: BTreeMap::new(),
            movies: BTreeMap::new(),
        }
    }

    fn unsupported<P: Into<String>, R: Into<String>>(&self, path: P, reason: R) -> Error {
        Error::unsupported_shape(self.source.clone(), self.target.clone(), path, reason)
    }

    fn add_actor(&mut self, actor_id: &str, actor: &Value) -> Result<()> {
        let path = format!("actors.{actor_id}");
        let Value::Object(actor) = actor else {
            return Err(self.unsupported(path, format!("expected a map, got {}", kind(actor))));
        };

        let mut record = Map::new();
        record.insert("person_id".into(), Value::String(actor_id.to_string()));
        for field in ["first_name", "last_name", "birth_year", "gender", "home_town", "hobbies"] {
            record.insert(field.into(), field_or_null(actor, field));
        }
        let funny = actor.get("is_funny").and_then(Value::as_bool).unwrap_or(false);
        record.insert(
            "personality".into(),
            if funny { Value::String("funny".into()) } else { Value::Null },
        );
        record.insert("children".into(), Value::Null);
        self.actors.insert(actor_id.to_string(), record);
        self.actor_movies.entry(actor_id.to_string()).or_default();

        match actor.get("filmography") {
            None | Some(Value::Null) => {}
            Some(Value::Array(entries)) => {
                for (index, entry) in entries.iter().enumerate() {
                    let (title, year) = match entry.as_array().map(Vec::as_slice) {
                        Some([Value::String(title), year]) => (title, year),
                        _ => {
                            return Err(self.unsupported(
                                format!("{path}.filmography.{index}"),
                                "expected a [title, year] pair",
                            ))
                        }
                    };
                    let mut movie = Map::new();
                    movie.insert("title".into(), Value::String(title.clone()));
                    movie.insert("year".into(), year.clone());
                    self.add_movie(actor_id, movie_id_from_title(title), movie);
                }
            }
            Some(other) => {
                return Err(self.unsupported(
                    format!("{path}.filmography"),
                    format!("expected a list, got {}", kind(other)),
                ))
            }
        }

        match actor.get("movies") {
            None | Some(Value::Null) => {}
            Some(Value::Object(movies)) => {
                for (movie_id, movie) in movies {
                    let movie = self.movie_map(&format!("{path}.movies.{movie_id}"), movie)?;
                    self.add_movie(actor_id, movie_id.clone(), movie);
                }
            }
            Some(Value::Array(movies)) => {
                for (index, movie) in movies.iter().enumerate() {
                    let movie_path = format!("{path}.movies.{index}");
                    let movie = self.movie_map(&movie_path, movie)?;
                    let Some(title) = movie.get("title").and_then(Value::as_str) else {
                        return Err(self.unsupported(movie_path, "listed movie has no title to derive an id from"));
                    };
                    let movie_id = movie_id_from_title(title);
                    self.add_movie(actor_id, movie_id, movie);
                }
            }
            Some(other) => {
                return Err(self.unsupported(
                    format!("{path}.movies"),
                    format!("expected a map or a list, got {}", kind(other)),
                ))
            }
        }

        Ok(())
    }

    fn movie_map(&self, path: &str, movie: &Value) -> Result<Map<String, Value>> {
        match movie {
            Value::Object(movie) => Ok(movie.clone()),
            other => Err(self.unsupported(path, format!("expected a map, got {}", kind(other)))),
        }
    }

    /// Record `movie` for `actor_id`, merging into an earlier occurrence
    fn add_movie(&mut self, actor_id: &str, movie_id: String, movie: Map<String, Value>) {
        self.actor_movies
            .entry(actor_id.to_string())
            .or_default()
            .insert(movie_id.clone());

        let Some(existing) = self.movies.get_mut(&movie_id) else {
            self.movies.insert(movie_id, movie);
            return;
        };
        for (field, value) in movie {
            match (existing.get_mut(&field), value) {
                (Some(Value::Object(cast)), Value::Object(more)) if field == "cast" => {
                    for (character_id, member) in more {
                        cast.entry(character_id).or_insert(member);
                    }
                }
                (Some(current), value) if current.is_null() => *current = value,
                (Some(_), _) => {}
                (None, value) => {
                    existing.insert(field, value);
                }
            }
        }
    }

    fn link_spouses(&mut self, actor_id: &str, actor: &Value) -> Result<()> {
        let path = format!("actors.{actor_id}.spouses");
        let spouses = match actor.get("spouses") {
            None | Some(Value::Null) => return Ok(()),
            Some(Value::Object(spouses)) => spouses,
            Some(other) => return Err(self.unsupported(path, format!("expected a map, got {}", kind(other)))),
        };

        for (spouse_id, spouse) in spouses {
            let spouse_path = format!("{path}.{spouse_id}");
            let Value::Object(spouse) = spouse else {
                return Err(self.unsupported(spouse_path, format!("expected a map, got {}", kind(spouse))));
            };
            if spouse_id == actor_id {
                return Err(self.unsupported(spouse_path, "an actor cannot be their own spouse"));
            }
            let has_children = match spouse.get("children") {
                None | Some(Value::Null) => false,
                Some(Value::Array(children)) => !children.is_empty(),
                Some(_) => true,
            };
            if has_children {
                return Err(self.unsupported(
                    format!("{spouse_path}.children"),
                    "children have no place in the normalized shape",
                ));
            }

            if !self.actors.contains_key(spouse_id) {
                let mut record = Map::new();
                record.insert("person_id".into(), Value::String(spouse_id.clone()));
                for field in ["first_name", "last_name", "birth_year", "gender", "home_town"] {
                    record.insert(field.into(), field_or_null(spouse, field));
                }
                for field in ["personality", "children", "hobbies"] {
                    record.insert(field.into(), Value::Null);
                }
                self.actors.insert(spouse_id.clone(), record);
                self.actor_movies.entry(spouse_id.clone()).or_default();
            }

            self.actor_spouses
                .entry(actor_id.to_string())
                .or_default()
                .insert(spouse_id.clone());
            self.actor_spouses
                .entry(spouse_id.clone())
                .or_default()
                .insert(actor_id.to_string());
        }
        Ok(())
    }

    fn split_casts(&mut self) -> Result<()> {
        let movie_ids: Vec<String> = self.movies.keys().cloned().collect();
        for movie_id in movie_ids {
            let path = format!("movies.{movie_id}.cast");
            let cast = match self.movies.get(&movie_id).and_then(|movie| movie.get("cast")) {
                None | Some(Value::Null) => None,
                Some(Value::Object(cast)) => Some(cast.clone()),
                Some(other) => return Err(self.unsupported(path, format!("expected a map, got {}", kind(other)))),
            };

            let mut members = Map::new();
            let mut characters = Map::new();
            let mut played_by: BTreeMap<String, String> = BTreeMap::new();
            for (character_id, member) in cast.iter().flatten() {
                let member_path = format!("{path}.{character_id}");
                let Value::Object(member) = member else {
                    return Err(self.unsupported(member_path, format!("expected a map, got {}", kind(member))));
                };
                let Some(actor_id) = member.get("actor").and_then(Value::as_str) else {
                    return Err(self.unsupported(format!("{member_path}.actor"), "cast member names no actor"));
                };
                if let Some(other) = played_by.insert(actor_id.to_string(), character_id.clone()) {
                    return Err(self.unsupported(
                        member_path,
                        format!("'{actor_id}' already plays '{other}' in this movie"),
                    ));
                }

                let mut entry = Map::new();
                entry.insert("actor_id".into(), Value::String(actor_id.to_string()));
                entry.insert("character_id".into(), Value::String(character_id.clone()));
                entry.insert("salary".into(), field_or_null(member, "salary"));
                members.insert(actor_id.to_string(), Value::Object(entry));

                let (first_name, last_name) = character_names(member);
                let mut character = Map::new();
                character.insert("person_id".into(), Value::String(character_id.clone()));
                character.insert("first_name".into(), Value::String(first_name));
                character.insert("last_name".into(), Value::String(last_name));
                characters.insert(character_id.clone(), Value::Object(character));

                self.ensure_actor(actor_id);
                self.actor_movies
                    .entry(actor_id.to_string())
                    .or_default()
                    .insert(movie_id.clone());
            }

            if let Some(movie) = self.movies.get_mut(&movie_id) {
                movie.insert("movie_id".into(), Value::String(movie_id.clone()));
                let (cast, characters) = match cast {
                    Some(_) => (Value::Object(members), Value::Object(characters)),
                    None => (Value::Null, Value::Null),
                };
                movie.insert("cast".into(), cast);
                movie.insert("characters".into(), characters);
            }
        }
        Ok(())
    }

    /// Add an actor known only from a cast entry, naming them from their id
    fn ensure_actor(&mut self, actor_id: &str) {
        if self.actors.contains_key(actor_id) {
            return;
        }
        debug!(actor_id, "Synthesizing actor referenced only by a cast");
        let (first_name, last_name) = actor_id.split_once('_').unwrap_or((actor_id, UNKNOWN_NAME));
        let mut record = Map::new();
        record.insert("person_id".into(), Value::String(actor_id.to_string()));
        record.insert("first_name".into(), Value::String(first_name.to_string()));
        record.insert("last_name".into(), Value::String(last_name.to_string()));
        for field in ["birth_year", "gender", "home_town", "hobbies", "personality", "children"] {
            record.insert(field.into(), Value::Null);
        }
        self.actors.insert(actor_id.to_string(), record);
    }

    fn finish(mut self, data: &RawDocument) -> RawDocument {
        let mut actors = Map::new();
        for (actor_id, mut record) in std::mem::take(&mut self.actors) {
            let movies = self.actor_movies.remove(&actor_id).unwrap_or_default();
            record.insert(
                "movies".into(),
                Value::Array(movies.into_iter().map(Value::String).collect()),
            );
            let spouses = match self.actor_spouses.remove(&actor_id) {
                Some(spouses) if !spouses.is_empty() => {
                    Value::Array(spouses.into_iter().map(Value::String).collect())
                }
                _ => Value::Null,
            };
            record.insert("spouses".into(), spouses);
            actors.insert(actor_id, Value::Object(record));
        }
        let movies: Map<String, Value> = self
            .movies
            .into_iter()
            .map(|(movie_id, movie)| (movie_id, Value::Object(movie)))
            .collect();

        debug!(actors = actors.len(), movies = movies.len(), "Normalized collections");

        let mut result = Map::new();
        for (field, value) in data {
            if field != "actors" {
                result.insert(field.clone(), value.clone());
            }
        }
        if !result.contains_key(SCHEMA_VERSION_FIELD) {
            result.insert(SCHEMA_VERSION_FIELD.into(), Value::String(self.source.to_string()));
        }
        result.insert("actors".into(), Value::Object(actors));
        result.insert("movies".into(), Value::Object(movies));
        result
    }
}

/// First and last name of a character from its cast entry.
///
/// Explicit `first_name`/`last_name` win; otherwise `name` is split at its
/// first space.
fn character_names(member: &Map<String, Value>) -> (String, String) {
    let name = member.get("name").and_then(Value::as_str).filter(|name| !name.is_empty());
    let (from_name_first, from_name_last) = match name.map(|name| name.split_once(' ')) {
        Some(Some((first, last))) => (first.to_string(), last.to_string()),
        Some(None) => (name.unwrap_or(UNKNOWN_NAME).to_string(), UNKNOWN_NAME.to_string()),
        None => (UNKNOWN_NAME.to_string(), UNKNOWN_NAME.to_string()),
    };
    let explicit = |field: &str| member.get(field).and_then(Value::as_str).map(str::to_string);
    (
        explicit("first_name").unwrap_or(from_name_first),
        explicit("last_name").unwrap_or(from_name_last),
    )
}

fn field_or_null(map: &Map<String, Value>, field: &str) -> Value {
    map.get(field).cloned().unwrap_or(Value::Null)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a map",
    }
}
