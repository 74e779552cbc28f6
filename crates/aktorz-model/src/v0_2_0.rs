//! Schema v0.2.0: the normalized shape
//!
//! People and movies live in two top-level collections and refer to each
//! other by id. Each movie records who played whom in `cast` (keyed by actor)
//! and describes the characters in `characters` (keyed by character).
//!
//! Copyright (c) 2025 Aktorz Team
//! Licensed under the Apache-2.0 license

use crate::constraints::{check_non_negative, check_year};
use aktorz_schemas::{Document, FieldViolation, ValidationContext, VersionId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const VERSION: &str = "v0.2.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    Funny,
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Funny => write!(f, "funny"),
        }
    }
}

/// A person who performs in movies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub person_id: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_year: Option<i64>,
    pub gender: Option<String>,
    pub personality: Option<Personality>,
    /// Person ids, sorted and unique
    pub spouses: Option<Vec<String>>,
    pub children: Option<Vec<String>>,
    pub home_town: Option<String>,
    pub hobbies: Option<BTreeMap<String, String>>,
    /// Movie ids, sorted and unique
    pub movies: Vec<String>,
}

impl Actor {
    pub fn actor_id(&self) -> &str {
        &self.person_id
    }
}

/// A person portrayed in a movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub person_id: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_year: Option<i64>,
    pub gender: Option<String>,
    pub personality: Option<Personality>,
    pub spouses: Option<Vec<String>>,
    pub children: Option<Vec<String>>,
    pub home_town: Option<String>,
}

impl Character {
    pub fn character_id(&self) -> &str {
        &self.person_id
    }
}

/// An actor performing as a character, paid `salary` (millions USD)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub actor_id: String,
    pub character_id: String,
    pub salary: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub movie_id: String,
    pub title: String,
    pub cast: Option<BTreeMap<String, CastMember>>,
    pub characters: Option<BTreeMap<String, Character>>,
    pub run_time_minutes: Option<i64>,
    pub year: Option<i64>,
    pub budget: Option<i64>,
    pub gross: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub schema_version: VersionId,
    pub actors: BTreeMap<String, Actor>,
    pub movies: BTreeMap<String, Movie>,
}

impl Model {
    /// Actors appearing in `movie_id`'s cast
    pub fn cast_of(&self, movie_id: &str) -> Vec<&Actor> {
        self.movies
            .get(movie_id)
            .and_then(|movie| movie.cast.as_ref())
            .map(|cast| cast.keys().filter_map(|actor_id| self.actors.get(actor_id)).collect())
            .unwrap_or_default()
    }
}

fn check_key_matches(key: &str, id: &str, field: &str, context: &ValidationContext, out: &mut Vec<FieldViolation>) {
    if key != id {
        out.push(
            context
                .child(field)
                .violation("key_mismatch", format!("'{id}' does not match its key '{key}'")),
        );
    }
}

impl Document for Model {
    fn schema_version(&self) -> &VersionId {
        &self.schema_version
    }

    fn set_schema_version(&mut self, version: VersionId) {
        self.schema_version = version;
    }

    fn check_fields(&self, context: &ValidationContext, out: &mut Vec<FieldViolation>) {
        let actors = context.child("actors");
        for (actor_id, actor) in &self.actors {
            let actor_context = actors.child(actor_id);
            check_key_matches(actor_id, &actor.person_id, "person_id", &actor_context, out);
            check_year(actor.birth_year, &actor_context.child("birth_year"), out);
        }

        let movies = context.child("movies");
        for (movie_id, movie) in &self.movies {
            let movie_context = movies.child(movie_id);
            check_key_matches(movie_id, &movie.movie_id, "movie_id", &movie_context, out);
            if let Some(cast) = &movie.cast {
                for (actor_id, member) in cast {
                    let member_context = movie_context.child("cast").child(actor_id);
                    check_key_matches(actor_id, &member.actor_id, "actor_id", &member_context, out);
                    check_non_negative(member.salary, &member_context.child("salary"), out);
                }
            }
            if let Some(characters) = &movie.characters {
                for (character_id, character) in characters {
                    let character_context = movie_context.child("characters").child(character_id);
                    check_key_matches(character_id, &character.person_id, "person_id", &character_context, out);
                }
            }
            check_non_negative(movie.run_time_minutes, &movie_context.child("run_time_minutes"), out);
            check_non_negative(movie.budget, &movie_context.child("budget"), out);
            check_non_negative(movie.gross, &movie_context.child("gross"), out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aktorz_schemas::document::materialize;
    use aktorz_schemas::FieldStrictness;
    use serde_json::json;

    #[test]
    fn test_keys_must_match_ids() {
        let value = json!({
            "schema_version": VERSION,
            "actors": {
                "vin_diesel": {"person_id": "vin", "first_name": "Vin", "last_name": "Diesel", "movies": []}
            },
            "movies": {
                "fast_five": {
                    "movie_id": "fast_five",
                    "title": "Fast Five",
                    "cast": {"vin_diesel": {"actor_id": "vin_diesel", "character_id": "dom", "salary": -1}}
                }
            }
        });
        let report = materialize::<Model>(&value, FieldStrictness::Strict).unwrap_err();
        assert_eq!(
            report.paths().collect::<Vec<_>>(),
            vec!["$.actors.vin_diesel.person_id", "$.movies.fast_five.cast.vin_diesel.salary"]
        );
    }

    #[test]
    fn test_personality() {
        let actor: Actor = serde_json::from_value(json!({
            "person_id": "charlie_chaplin",
            "first_name": "Charlie",
            "last_name": "Chaplin",
            "personality": "funny",
            "movies": ["modern_times"]
        }))
        .unwrap();
        assert_eq!(actor.personality, Some(Personality::Funny));
        assert_eq!(actor.actor_id(), "charlie_chaplin");
        assert!(serde_json::from_value::<Personality>(json!("grumpy")).is_err());
    }
}
